//! Retry command implementation.

use super::parse_id;
use crate::cli::RetryArgs;
use crate::error::Result;
use crate::output::Formatter;
use crate::workspace::Workspace;
use mdx_domain::DocumentStatus;

/// Execute the retry command.
pub fn execute_retry(args: RetryArgs, workspace: &Workspace, formatter: &Formatter) -> Result<()> {
    let id = parse_id(&args.id)?;
    let status = workspace.pipeline.reprocess(id)?;

    match status {
        DocumentStatus::Done => {
            println!("{}", formatter.success(&format!("Document {} is done", id)))
        }
        other => {
            let detail = workspace.query.get(id)?;
            let reason = detail.document.error_message.unwrap_or_default();
            println!(
                "{}",
                formatter.error(&format!("Document {} is {}: {}", id, other, reason))
            );
        }
    }

    Ok(())
}
