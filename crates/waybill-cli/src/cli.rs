//! CLI command definitions and argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Waybill - Extract recipients from OCR'd shipping labels and match them to a directory.
#[derive(Debug, Parser)]
#[command(name = "waybill")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path (default: ~/.waybill/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the text-generation service
    #[arg(long, env = "OLLAMA_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Model used for extraction
    #[arg(long, env = "OLLAMA_MODEL", global = true)]
    pub model: Option<String>,

    /// Per-label model request timeout in seconds
    #[arg(long, global = true)]
    pub timeout_secs: Option<f64>,

    /// Combined score at or above which a match is confirmed (0-100)
    #[arg(long, env = "FUZZY_MATCH_THRESHOLD", global = true)]
    pub threshold: Option<f64>,

    /// Width of the review band below the threshold
    #[arg(long, global = true)]
    pub review_margin: Option<f64>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Process a batch of labels and write results and review CSVs
    Run(RunArgs),

    /// Extract pairs from a single label
    Extract(ExtractArgs),

    /// Check that the text-generation service and model are available
    Check,
}

/// Arguments for the run command.
#[derive(Debug, Parser)]
pub struct RunArgs {
    /// Labels CSV with `sample_id` and `raw_text` (or `ocr_text`) columns
    #[arg(short, long)]
    pub input: PathBuf,

    /// Recipient directory CSV
    #[arg(short, long)]
    pub directory: PathBuf,

    /// Results CSV path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Review queue CSV path
    #[arg(long)]
    pub review_log: Option<PathBuf>,

    /// Use pattern extraction only; never contact the model
    #[arg(long)]
    pub rules_only: bool,

    /// Process labels concurrently
    #[arg(long)]
    pub concurrent: bool,
}

/// Arguments for the extract command.
#[derive(Debug, Parser)]
pub struct ExtractArgs {
    /// Label text
    pub text: Option<String>,

    /// Read label text from stdin
    #[arg(long, conflicts_with = "text")]
    pub stdin: bool,

    /// Recipient directory CSV to match against
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// Use pattern extraction only; never contact the model
    #[arg(long)]
    pub rules_only: bool,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_command() {
        let cli = Cli::parse_from([
            "waybill",
            "run",
            "--input",
            "labels.csv",
            "--directory",
            "recipients.csv",
            "--rules-only",
        ]);
        match cli.command {
            Command::Run(args) => {
                assert_eq!(args.input, PathBuf::from("labels.csv"));
                assert!(args.rules_only);
                assert!(!args.concurrent);
                assert!(args.output.is_none());
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_global_overrides() {
        let cli = Cli::parse_from([
            "waybill",
            "--threshold",
            "80",
            "-vv",
            "extract",
            "ship to john smith",
            "--format",
            "json",
        ]);
        assert_eq!(cli.threshold, Some(80.0));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.format, Some(CliFormat::Json));
        match cli.command {
            Command::Extract(args) => assert_eq!(args.text.as_deref(), Some("ship to john smith")),
            _ => panic!("Expected Extract command"),
        }
    }

    #[test]
    fn test_check_command() {
        let cli = Cli::parse_from(["waybill", "check"]);
        assert!(matches!(cli.command, Command::Check));
    }

    #[test]
    fn test_stdin_conflicts_with_text() {
        assert!(Cli::try_parse_from(["waybill", "extract", "text", "--stdin"]).is_err());
    }
}
