//! MDExtractor HTTP service
//!
//! Starts the document ingestion and query API.

use mdx_api::{config::ServiceConfig, init_tracing, start_server, ServerError};
use std::env;
use std::path::Path;
use std::process;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), ServerError> {
    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();

    let config_path = if args.len() > 2 && args[1] == "--config" {
        Some(Path::new(&args[2]))
    } else if args.len() > 1 && args[1] == "--help" {
        print_help();
        process::exit(0);
    } else {
        None
    };

    let config = ServiceConfig::load(config_path)?;
    init_tracing(&config.log_filter);

    if config_path.is_none() {
        tracing::warn!("No config file specified, using defaults and environment");
    }

    start_server(config).await
}

fn print_help() {
    println!("MDExtractor - Document ingestion and metadata API");
    println!();
    println!("USAGE:");
    println!("    mdx-api [--config <path-to-config.toml>]");
    println!();
    println!("OPTIONS:");
    println!("    --config <file>    Load configuration from TOML file");
    println!("    --help             Print this help message");
    println!();
    println!("ENVIRONMENT:");
    println!("    DATABASE_PATH      SQLite database file (default: mdextractor.db)");
    println!("    UPLOAD_DIR         Directory for uploaded files (default: uploads)");
    println!("    MDX_BIND           Listen address as host:port (default: 127.0.0.1:8000)");
    println!("    RUST_LOG           Tracing filter (default: info)");
    println!();
    println!("ENDPOINTS:");
    println!("    POST /documents         Upload a .docx (multipart field 'file')");
    println!("    GET  /documents         List documents (?limit=&offset=)");
    println!("    GET  /documents/:id     Document with core metadata");
    println!("    GET  /health            Liveness check");
    println!();
}
