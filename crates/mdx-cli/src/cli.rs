//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// MDExtractor CLI - Ingest .docx files and inspect their extracted metadata.
#[derive(Debug, Parser)]
#[command(name = "mdx")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// SQLite database file
    #[arg(long, global = true, env = "DATABASE_PATH")]
    pub database: Option<PathBuf>,

    /// Directory uploaded files are stored under
    #[arg(long, global = true, env = "UPLOAD_DIR")]
    pub upload_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (IDs only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Ingest a .docx file, or every .docx under a folder
    Ingest(IngestArgs),

    /// List documents, newest first
    List(ListArgs),

    /// Show one document with its core metadata
    Show(ShowArgs),

    /// Run extraction again for a failed document
    Retry(RetryArgs),

    /// List documents stuck at processing
    Stuck(StuckArgs),
}

/// Arguments for the ingest command.
#[derive(Debug, Parser)]
pub struct IngestArgs {
    /// File or folder (searched recursively for *.docx)
    pub input: PathBuf,
}

/// Arguments for the list command.
#[derive(Debug, Parser)]
pub struct ListArgs {
    /// Maximum number of results
    #[arg(short, long, default_value = "20")]
    pub limit: u32,

    /// Number of results to skip
    #[arg(short, long, default_value = "0")]
    pub offset: u64,
}

/// Arguments for the show command.
#[derive(Debug, Parser)]
pub struct ShowArgs {
    /// Document ID
    pub id: String,
}

/// Arguments for the retry command.
#[derive(Debug, Parser)]
pub struct RetryArgs {
    /// Document ID
    pub id: String,
}

/// Arguments for the stuck command.
#[derive(Debug, Parser)]
pub struct StuckArgs {
    /// Minimum time at processing, in seconds
    #[arg(long, default_value = "300")]
    pub older_than: u64,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_command() {
        let cli = Cli::parse_from(["mdx", "ingest", "docs/"]);
        match cli.command {
            Command::Ingest(args) => assert_eq!(args.input, PathBuf::from("docs/")),
            _ => panic!("Expected Ingest command"),
        }
    }

    #[test]
    fn test_list_defaults() {
        let cli = Cli::parse_from(["mdx", "list"]);
        match cli.command {
            Command::List(args) => {
                assert_eq!(args.limit, 20);
                assert_eq!(args.offset, 0);
            }
            _ => panic!("Expected List command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "mdx",
            "show",
            "abc",
            "--database",
            "/tmp/x.db",
            "--format",
            "json",
            "--no-color",
        ]);
        assert_eq!(cli.database, Some(PathBuf::from("/tmp/x.db")));
        assert!(matches!(cli.format, Some(CliFormat::Json)));
        assert!(cli.no_color);
    }

    #[test]
    fn test_missing_command_is_error() {
        assert!(Cli::try_parse_from(["mdx"]).is_err());
    }
}
