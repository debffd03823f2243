//! Configuration module
//!
//! This module handles:
//! - Project-level configuration (node-distance.toml)
//! - CLI defaults and their precedence against flags

mod project_config;

pub use project_config::{
    load_config_file, load_project_config, ProjectConfig, CONFIG_TEMPLATE, TOML_CONFIG_NAME,
};
