//! Command implementations.

pub mod ingest;
pub mod list;
pub mod retry;
pub mod show;
pub mod stuck;

pub use self::ingest::execute_ingest;
pub use self::list::execute_list;
pub use self::retry::execute_retry;
pub use self::show::execute_show;
pub use self::stuck::execute_stuck;

use crate::error::{CliError, Result};
use mdx_domain::DocumentId;

/// Parse a document ID argument.
fn parse_id(id: &str) -> Result<DocumentId> {
    DocumentId::from_string(id)
        .map_err(|e| CliError::InvalidInput(format!("Invalid document ID '{}': {}", id, e)))
}
