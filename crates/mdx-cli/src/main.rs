//! MDExtractor CLI - Ingest .docx files and inspect their metadata.

use clap::Parser;
use mdx_cli::commands;
use mdx_cli::{Cli, Command, Config, Formatter, Workspace};
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> mdx_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load config, falling back to defaults
    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Warning: {}; using default configuration", e);
        Config::default()
    });

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.settings.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    // Create formatter
    let formatter = Formatter::new(format, color_enabled);

    // Flags and environment override the config file
    let database = cli.database.unwrap_or(config.storage.database_path);
    let upload_dir = cli.upload_dir.unwrap_or(config.storage.upload_dir);
    let workspace = Workspace::open(&database, &upload_dir)?;

    match cli.command {
        Command::Ingest(args) => commands::execute_ingest(args, &workspace, &formatter)?,
        Command::List(args) => commands::execute_list(args, &workspace, &formatter)?,
        Command::Show(args) => commands::execute_show(args, &workspace, &formatter)?,
        Command::Retry(args) => commands::execute_retry(args, &workspace, &formatter)?,
        Command::Stuck(args) => commands::execute_stuck(args, &workspace, &formatter)?,
    }

    Ok(())
}
