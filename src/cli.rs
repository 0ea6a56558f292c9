use clap::Parser;
use std::path::PathBuf;

use crate::config::{AppConfig, SvgEncoding};

#[derive(Parser, Debug)]
#[command(name = "logofinder")]
#[command(about = "Finds a company logo URL for each domain read from standard input")]
#[command(version)]
pub struct Cli {
    /// Create default configuration file at ./config/logofinder.toml
    #[arg(long)]
    pub init: bool,

    /// Configuration file (defaults to ./config/logofinder.toml, then built-in defaults)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Read domains from a file instead of stdin (.json files may hold an array of domains)
    #[arg(short, long, value_name = "FILE")]
    pub input_file: Option<PathBuf>,

    /// Write the CSV report to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Number of domains resolved concurrently (overrides config)
    #[arg(short = 'j', long, value_name = "N")]
    pub parallel: Option<usize>,

    /// Inline SVG data URL encoding: 'percent' or 'base64' (overrides config)
    #[arg(long, value_name = "ENCODING")]
    pub svg_encoding: Option<SvgEncoding>,

    /// Skip the DNS connectivity precheck
    #[arg(long)]
    pub skip_precheck: bool,

    /// Export a JSON batch summary to this file
    #[arg(long, value_name = "FILE")]
    pub summary_json: Option<PathBuf>,

    /// Verbose logging (use -v for INFO, -vv for DEBUG with every strategy and detector attempt)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only print errors and the final summary
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

impl Cli {
    /// Apply command-line overrides on top of file configuration
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(parallel) = self.parallel {
            config.batch.parallel = parallel;
        }
        if let Some(encoding) = self.svg_encoding {
            config.detectors.svg_encoding = encoding;
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if let Some(parallel) = self.parallel {
            if parallel == 0 {
                return Err("Parallel jobs must be greater than 0".to_string());
            }
            if parallel > 100 {
                return Err("Parallel jobs cannot exceed 100".to_string());
            }
        }
        Ok(())
    }
}
