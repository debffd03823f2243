//! Project-level configuration support
//!
//! Loads configuration from `node-distance.toml` or `.node-distancerc.json`
//! in the working directory, or from an explicit `--config` path.
//!
//! # Configuration Format
//!
//! ```toml
//! # node-distance.toml
//!
//! [distances]
//! cutoff = 25
//!
//! [nodedist]
//! xmin = 1
//! xmax = 12
//!
//! [tokenvsnode]
//! xmin = -5
//! xmax = 5
//!
//! [defaults]
//! format = "text"
//! workers = 8
//! ```
//!
//! Command-line flags always win over the file; the file wins over built-in
//! defaults.

use anyhow::Context;
use node_distance_fast::{DEFAULT_CUTOFF, DEFAULT_NODEDIST_XMIN};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

/// TOML config file name, preferred
pub const TOML_CONFIG_NAME: &str = "node-distance.toml";
/// JSON config file name, fallback
pub const JSON_CONFIG_NAME: &str = ".node-distancerc.json";

/// Project-level configuration loaded from node-distance.toml or similar
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProjectConfig {
    /// Distance engine settings
    #[serde(default)]
    pub distances: DistancesConfig,

    /// Bounds for the node distance distribution
    #[serde(default)]
    pub nodedist: BoundsConfig,

    /// Bounds for the token - node distribution
    #[serde(default)]
    pub tokenvsnode: BoundsConfig,

    /// Default CLI flags
    #[serde(default)]
    pub defaults: CliDefaults,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct DistancesConfig {
    /// Maximum path length explored per source node
    #[serde(default)]
    pub cutoff: Option<usize>,
}

/// Clipping bounds of a distribution
#[derive(Debug, Clone, Deserialize, Default)]
pub struct BoundsConfig {
    #[serde(default)]
    pub xmin: Option<i64>,
    #[serde(default)]
    pub xmax: Option<i64>,
}

/// Default CLI flags that can be set in project config
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CliDefaults {
    /// Default output format (text, json)
    #[serde(default)]
    pub format: Option<String>,

    /// Default number of workers
    #[serde(default)]
    pub workers: Option<usize>,
}

/// Load project configuration from a directory.
///
/// Searches for configuration files in this order:
/// 1. `node-distance.toml`
/// 2. `.node-distancerc.json`
///
/// Returns default configuration if no config file is found or none parses.
pub fn load_project_config(dir: &Path) -> ProjectConfig {
    for name in [TOML_CONFIG_NAME, JSON_CONFIG_NAME] {
        let path = dir.join(name);
        if !path.exists() {
            continue;
        }
        match load_config_file(&path) {
            Ok(config) => {
                debug!("Loaded project config from {}", path.display());
                return config;
            }
            Err(e) => {
                warn!("Failed to load {}: {:#}", path.display(), e);
            }
        }
    }

    // No config found, return defaults
    debug!("No project config found, using defaults");
    ProjectConfig::default()
}

/// Load an explicitly named config file. `.json` is read as JSON, anything
/// else as TOML.
pub fn load_config_file(path: &Path) -> anyhow::Result<ProjectConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let config: ProjectConfig = if is_json {
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid JSON in {}", path.display()))?
    } else {
        toml::from_str(&content).with_context(|| format!("Invalid TOML in {}", path.display()))?
    };
    Ok(config)
}

impl ProjectConfig {
    /// Effective cutoff (flag > config > default)
    pub fn cutoff(&self, flag: Option<usize>) -> usize {
        flag.or(self.distances.cutoff).unwrap_or(DEFAULT_CUTOFF)
    }

    /// Effective nodedist bounds; xmin falls back to 1
    pub fn nodedist_bounds(&self, xmin: Option<i64>, xmax: Option<i64>) -> (Option<i64>, Option<i64>) {
        (
            xmin.or(self.nodedist.xmin).or(Some(DEFAULT_NODEDIST_XMIN)),
            xmax.or(self.nodedist.xmax),
        )
    }

    /// Effective tokenvsnode bounds; unbounded by default
    pub fn tokenvsnode_bounds(&self, xmin: Option<i64>, xmax: Option<i64>) -> (Option<i64>, Option<i64>) {
        (xmin.or(self.tokenvsnode.xmin), xmax.or(self.tokenvsnode.xmax))
    }

    /// Effective output format name
    pub fn format<'a>(&'a self, flag: Option<&'a str>) -> &'a str {
        flag.or(self.defaults.format.as_deref()).unwrap_or("text")
    }

    /// Effective worker count, `None` leaves rayon's default pool alone
    pub fn workers(&self, flag: Option<usize>) -> Option<usize> {
        flag.or(self.defaults.workers)
    }
}

/// Commented template written by `node-distance init`
pub const CONFIG_TEMPLATE: &str = r#"# node-distance configuration
#
# Command-line flags override these values.

[distances]
# Longest path (in tree edges) explored from each node
cutoff = 25

[nodedist]
# Distances <= xmin are counted in the xmin bin, >= xmax in the xmax bin
xmin = 1
# xmax = 12

[tokenvsnode]
# xmin = -5
# xmax = 5

[defaults]
# Output format (text, json)
format = "text"
# Parallel workers (1-64), default: one per core
# workers = 8
"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_project_config(dir.path());

        assert_eq!(config.cutoff(None), DEFAULT_CUTOFF);
        assert_eq!(config.nodedist_bounds(None, None), (Some(1), None));
        assert_eq!(config.tokenvsnode_bounds(None, None), (None, None));
        assert_eq!(config.format(None), "text");
        assert_eq!(config.workers(None), None);
    }

    #[test]
    fn test_toml_config() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            TOML_CONFIG_NAME,
            r#"
[distances]
cutoff = 4

[nodedist]
xmax = 10

[tokenvsnode]
xmin = -3
xmax = 3

[defaults]
format = "json"
workers = 2
"#,
        );
        let config = load_project_config(dir.path());

        assert_eq!(config.cutoff(None), 4);
        assert_eq!(config.nodedist_bounds(None, None), (Some(1), Some(10)));
        assert_eq!(config.tokenvsnode_bounds(None, None), (Some(-3), Some(3)));
        assert_eq!(config.format(None), "json");
        assert_eq!(config.workers(None), Some(2));
    }

    #[test]
    fn test_flags_override_config() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            TOML_CONFIG_NAME,
            "[distances]\ncutoff = 4\n[nodedist]\nxmin = 2\n[defaults]\nformat = \"json\"\n",
        );
        let config = load_project_config(dir.path());

        assert_eq!(config.cutoff(Some(9)), 9);
        assert_eq!(config.nodedist_bounds(Some(3), Some(7)), (Some(3), Some(7)));
        assert_eq!(config.format(Some("text")), "text");
    }

    #[test]
    fn test_json_config() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            JSON_CONFIG_NAME,
            r#"{"distances": {"cutoff": 6}, "defaults": {"workers": 3}}"#,
        );
        let config = load_project_config(dir.path());

        assert_eq!(config.cutoff(None), 6);
        assert_eq!(config.workers(None), Some(3));
    }

    #[test]
    fn test_toml_preferred_over_json() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), TOML_CONFIG_NAME, "[distances]\ncutoff = 1\n");
        write(dir.path(), JSON_CONFIG_NAME, r#"{"distances": {"cutoff": 2}}"#);

        assert_eq!(load_project_config(dir.path()).cutoff(None), 1);
    }

    #[test]
    fn test_malformed_discovered_config_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), TOML_CONFIG_NAME, "[distances\ncutoff = ");
        write(dir.path(), JSON_CONFIG_NAME, r#"{"distances": {"cutoff": 2}}"#);

        // Broken TOML is skipped, JSON still applies
        assert_eq!(load_project_config(dir.path()).cutoff(None), 2);
    }

    #[test]
    fn test_explicit_config_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(load_config_file(&missing).is_err());

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "[distances]\ncutoff = \"many\"\n").unwrap();
        let err = load_config_file(&bad).unwrap_err();
        assert!(format!("{err:#}").contains("Invalid TOML"));
    }

    #[test]
    fn test_template_parses() {
        let config: ProjectConfig = toml::from_str(CONFIG_TEMPLATE).unwrap();
        assert_eq!(config.distances.cutoff, Some(DEFAULT_CUTOFF));
        assert_eq!(config.nodedist.xmin, Some(DEFAULT_NODEDIST_XMIN));
        assert_eq!(config.defaults.format.as_deref(), Some("text"));
    }
}
