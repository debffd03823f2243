//! CLI command definitions and handlers

mod distances;
mod distribution;
mod init;

use crate::config::{load_config_file, load_project_config, ProjectConfig};
use crate::input::{read_corpus, InputFormat};
use crate::reporters::{DistributionKind, OutputFormat};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use node_distance_fast::{compute_sentences, BatchDistances, Sentence};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

const MAX_WORKERS: usize = 64;

fn check_workers(n: usize) -> Result<usize, String> {
    if n == 0 {
        Err("workers must be at least 1".to_string())
    } else if n > MAX_WORKERS {
        Err(format!("workers cannot exceed {MAX_WORKERS}"))
    } else {
        Ok(n)
    }
}

/// Parse and validate workers count (1-64)
fn parse_workers(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    check_workers(n)
}

/// node-distance - syntactic vs. linear distance in dependency parses
#[derive(Parser, Debug)]
#[command(name = "node-distance")]
#[command(
    version,
    about = "Node and token distances over dependency trees, and their distributions",
    long_about = "For every pair of nodes in a dependency tree, node-distance computes the \
number of tree edges between them (node distance) and how far apart they are in the \
sentence (token distance), then summarizes them as clipped empirical distributions.\n\n\
Input is CoNLL-U (Stanza, Trankit, UDPipe) or JSON Lines of {\"edges\", \"num_nodes\"}.",
    after_help = "\
Examples:
  node-distance nodedist corpus.conllu                 Node distance distribution
  node-distance nodedist corpus.conllu --xmax 10       Fold distances >= 10 into one bin
  node-distance tokenvsnode corpus.conllu -f json      token - node distribution as JSON
  node-distance distances parsed.jsonl --cutoff 3      Pair records, paths up to 3 edges
  cat parsed.jsonl | node-distance nodedist -          Read JSON Lines from stdin
  node-distance init                                   Write node-distance.toml"
)]
pub struct Cli {
    /// Config file (default: node-distance.toml or .node-distancerc.json in the working directory)
    #[arg(long, global = true, env = "NODE_DISTANCE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// Number of parallel workers (1-64, default: one per core)
    #[arg(long, global = true, value_parser = parse_workers)]
    pub workers: Option<usize>,

    /// Output format: text, json (default: text)
    #[arg(long, short = 'f', global = true, value_parser = ["text", "json"])]
    pub format: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where the sentences come from
#[derive(Args, Debug)]
pub struct InputArgs {
    /// Input file (.conllu or .jsonl), or - for stdin
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Input format (default: from the file extension, jsonl for stdin)
    #[arg(long, value_parser = ["conllu", "jsonl"])]
    pub input_format: Option<String>,

    /// Longest path (in tree edges) explored from each node (default: 25)
    #[arg(long)]
    pub cutoff: Option<usize>,
}

/// Clipping bounds of a distribution
#[derive(Args, Debug)]
pub struct BoundArgs {
    /// Values <= xmin are counted in the xmin bin
    #[arg(long, allow_negative_numbers = true)]
    pub xmin: Option<i64>,

    /// Values >= xmax are counted in the xmax bin
    #[arg(long, allow_negative_numbers = true)]
    pub xmax: Option<i64>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Pairwise node and token distances, one block per sentence
    Distances {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Distribution of node distances (xmin defaults to 1)
    Nodedist {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        bounds: BoundArgs,
    },

    /// Distribution of token distance - node distance (unbounded by default)
    #[command(after_help = "\
Positive values: words far apart in the sentence but close in the tree.
Negative values: words adjacent in the sentence but distant in the tree.")]
    Tokenvsnode {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        bounds: BoundArgs,
    },

    /// Write a node-distance.toml config file with example settings
    Init {
        /// Directory to write the config into
        #[arg(default_value = ".")]
        dir: PathBuf,
    },
}

/// Settings resolved from flags, config file and defaults
pub(crate) struct RunContext {
    pub config: ProjectConfig,
    pub format: OutputFormat,
    pub workers: Option<usize>,
}

impl RunContext {
    fn resolve(cli: &Cli) -> Result<Self> {
        let config = match &cli.config {
            Some(path) => load_config_file(path)?,
            None => load_project_config(Path::new(".")),
        };
        let format = OutputFormat::from_str(config.format(cli.format.as_deref()))?;
        let workers = config
            .workers(cli.workers)
            .map(check_workers)
            .transpose()
            .map_err(anyhow::Error::msg)
            .context("Invalid workers in config")?;

        Ok(RunContext {
            config,
            format,
            workers,
        })
    }

    /// Read the corpus named by `input`
    pub fn read(&self, input: &InputArgs) -> Result<Vec<Sentence>> {
        let format = input
            .input_format
            .as_deref()
            .map(InputFormat::from_str)
            .transpose()?;
        read_corpus(&input.input, format)
    }

    /// Run the batch engine, on a dedicated pool when a worker count is set
    pub fn compute(&self, sentences: &[Sentence], cutoff: usize) -> Result<BatchDistances> {
        info!(
            sentences = sentences.len(),
            cutoff,
            workers = ?self.workers,
            "computing node distances"
        );
        let batch = match self.workers {
            Some(n) => {
                let pool = rayon::ThreadPoolBuilder::new().num_threads(n).build()?;
                pool.install(|| compute_sentences(sentences, cutoff))
            }
            None => compute_sentences(sentences, cutoff),
        };
        batch.context("Failed to compute node distances")
    }
}

/// Write a rendered report to stdout
fn emit(mut rendered: String) {
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }
    print!("{rendered}");
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    if let Commands::Init { dir } = &cli.command {
        return init::run(dir);
    }

    let ctx = RunContext::resolve(&cli)?;
    match &cli.command {
        Commands::Distances { input } => distances::run(input, &ctx),
        Commands::Nodedist { input, bounds } => {
            distribution::run(DistributionKind::Nodedist, input, bounds, &ctx)
        }
        Commands::Tokenvsnode { input, bounds } => {
            distribution::run(DistributionKind::Tokenvsnode, input, bounds, &ctx)
        }
        Commands::Init { .. } => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_workers() {
        assert_eq!(parse_workers("4"), Ok(4));
        assert!(parse_workers("0").is_err());
        assert!(parse_workers("65").is_err());
        assert!(parse_workers("many").is_err());
    }

    #[test]
    fn test_negative_bounds() {
        let cli = Cli::try_parse_from([
            "node-distance",
            "tokenvsnode",
            "corpus.conllu",
            "--xmin",
            "-5",
            "--xmax",
            "5",
        ])
        .unwrap();
        match cli.command {
            Commands::Tokenvsnode { bounds, .. } => {
                assert_eq!(bounds.xmin, Some(-5));
                assert_eq!(bounds.xmax, Some(5));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "node-distance",
            "nodedist",
            "-",
            "--cutoff",
            "3",
            "--format",
            "json",
            "--workers",
            "2",
        ])
        .unwrap();
        assert_eq!(cli.format.as_deref(), Some("json"));
        assert_eq!(cli.workers, Some(2));
        match cli.command {
            Commands::Nodedist { input, bounds } => {
                assert_eq!(input.input, PathBuf::from("-"));
                assert_eq!(input.cutoff, Some(3));
                assert_eq!(bounds.xmin, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_unknown_format_rejected() {
        assert!(Cli::try_parse_from(["node-distance", "nodedist", "x.conllu", "-f", "sarif"]).is_err());
    }
}
