//! List command implementation.

use crate::cli::ListArgs;
use crate::error::Result;
use crate::output::Formatter;
use crate::workspace::Workspace;

/// Execute the list command.
pub fn execute_list(args: ListArgs, workspace: &Workspace, formatter: &Formatter) -> Result<()> {
    let page = workspace.query.list(Some(args.limit), Some(args.offset))?;

    println!("{}", formatter.format_documents(&page.items)?);

    Ok(())
}
