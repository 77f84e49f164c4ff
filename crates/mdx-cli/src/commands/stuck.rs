//! Stuck command implementation.

use crate::cli::StuckArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::workspace::Workspace;
use mdx_ingest::DocumentView;
use std::time::Duration;

/// Execute the stuck command.
pub fn execute_stuck(args: StuckArgs, workspace: &Workspace, formatter: &Formatter) -> Result<()> {
    let documents = workspace
        .ledger()
        .stuck_processing(Duration::from_secs(args.older_than))
        .map_err(|e| CliError::Storage(e.to_string()))?;

    let views: Vec<DocumentView> = documents.iter().map(DocumentView::from).collect();
    println!("{}", formatter.format_documents(&views)?);

    Ok(())
}
