//! Show command implementation.

use super::parse_id;
use crate::cli::ShowArgs;
use crate::error::Result;
use crate::output::Formatter;
use crate::workspace::Workspace;

/// Execute the show command.
pub fn execute_show(args: ShowArgs, workspace: &Workspace, formatter: &Formatter) -> Result<()> {
    let id = parse_id(&args.id)?;
    let detail = workspace.query.get(id)?;

    println!("{}", formatter.format_detail(&detail)?);

    Ok(())
}
