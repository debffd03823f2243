//! Edge adapters: turn parser output files into `(all_edges, num_nodes)`
//!
//! Supported inputs:
//! - `conllu` - CoNLL-U as exported by Stanza, Trankit, UDPipe
//! - `jsonl`  - one `{"edges": [[parent, child], ...], "num_nodes": n}` per line

mod conllu;
mod jsonl;

use anyhow::{anyhow, Context, Result};
use node_distance_fast::Sentence;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// A malformed line in an input file
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

impl ParseError {
    fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// Supported input formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Conllu,
    Jsonl,
}

impl InputFormat {
    /// Infer the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "conllu" | "conll" => Some(InputFormat::Conllu),
            "jsonl" | "ndjson" | "json" => Some(InputFormat::Jsonl),
            _ => None,
        }
    }

    /// Parse a whole document in this format
    pub fn parse(self, content: &str) -> Result<Vec<Sentence>, ParseError> {
        match self {
            InputFormat::Conllu => conllu::parse(content),
            InputFormat::Jsonl => jsonl::parse(content),
        }
    }
}

impl FromStr for InputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "conllu" | "conll" => Ok(InputFormat::Conllu),
            "jsonl" | "ndjson" | "json" => Ok(InputFormat::Jsonl),
            _ => Err(anyhow!(
                "Unknown input format '{}'. Valid formats: conllu, jsonl",
                s
            )),
        }
    }
}

impl std::fmt::Display for InputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputFormat::Conllu => write!(f, "conllu"),
            InputFormat::Jsonl => write!(f, "jsonl"),
        }
    }
}

/// Read a corpus from a file, or from stdin when `path` is `-`.
///
/// An explicit `format` wins; otherwise it is inferred from the extension.
/// Stdin without an explicit format is read as JSON Lines.
pub fn read_corpus(path: &Path, format: Option<InputFormat>) -> Result<Vec<Sentence>> {
    let (content, format) = if path == Path::new("-") {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read stdin")?;
        (content, format.unwrap_or(InputFormat::Jsonl))
    } else {
        let format = match format.or_else(|| InputFormat::from_path(path)) {
            Some(format) => format,
            None => anyhow::bail!(
                "Cannot infer input format of {} (use --input-format conllu|jsonl)",
                path.display()
            ),
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        (content, format)
    };

    let sentences = format
        .parse(&content)
        .with_context(|| format!("Failed to parse {} as {}", path.display(), format))?;
    debug!(sentences = sentences.len(), %format, "read corpus from {}", path.display());

    Ok(sentences)
}
