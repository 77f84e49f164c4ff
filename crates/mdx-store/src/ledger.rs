//! SQLite-backed document ledger

use crate::codec::{fields_from_json, fields_to_json};
use crate::LedgerError;
use chrono::{DateTime, Utc};
use mdx_domain::page::MAX_LIMIT;
use mdx_domain::traits::DocumentLedger;
use mdx_domain::{
    Document, DocumentDetail, DocumentId, DocumentStatus, FieldMap, MetadataRecord, Page,
    StorageReference,
};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tracing::debug;

const DOCUMENT_COLUMNS: &str =
    "d.id, d.original_filename, d.storage_url, d.status, d.created_at, d.updated_at, d.error_message";

/// Configuration for the ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Upper bound on `list` page size
    #[serde(default = "default_max_list_limit")]
    pub max_list_limit: u32,

    /// How long a writer waits on a locked database (milliseconds)
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

fn default_max_list_limit() -> u32 {
    MAX_LIMIT
}

fn default_busy_timeout_ms() -> u64 {
    5_000
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            max_list_limit: default_max_list_limit(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

impl LedgerConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_list_limit == 0 {
            return Err("max_list_limit must be greater than 0".to_string());
        }
        if self.max_list_limit > MAX_LIMIT {
            return Err(format!("max_list_limit must not exceed {}", MAX_LIMIT));
        }
        Ok(())
    }
}

/// SQLite-based implementation of DocumentLedger
///
/// The connection is owned by the ledger and acquired per operation, so a
/// single ledger can be shared (`Arc<SqliteLedger>`) across concurrent
/// ingestions. Each mutating operation is one transaction.
pub struct SqliteLedger {
    conn: Mutex<Connection>,
    config: LedgerConfig,
}

impl SqliteLedger {
    /// Open (or create) a ledger at the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    pub fn new<P: AsRef<Path>>(path: P, config: LedgerConfig) -> Result<Self, LedgerError> {
        config.validate().map_err(LedgerError::InvalidData)?;

        let conn = Connection::open(path)?;
        conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))?;
        // Readers don't block the writer; in-memory databases report "memory"
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get::<_, String>(0))?;

        let ledger = Self {
            conn: Mutex::new(conn),
            config,
        };
        ledger.initialize_schema()?;
        Ok(ledger)
    }

    /// Open an in-memory ledger with default configuration
    pub fn in_memory() -> Result<Self, LedgerError> {
        Self::new(":memory:", LedgerConfig::default())
    }

    /// Get the ledger configuration
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<(), LedgerError> {
        let schema = include_str!("schema.sql");
        self.conn()?.execute_batch(schema)?;
        Ok(())
    }

    /// Acquire the connection for the duration of one operation
    fn conn(&self) -> Result<MutexGuard<'_, Connection>, LedgerError> {
        self.conn
            .lock()
            .map_err(|e| LedgerError::Unavailable(format!("connection lock poisoned: {}", e)))
    }

    /// Documents stuck at `processing` whose last transition is older than `older_than`
    ///
    /// A document stays at `processing` when its completion could not be
    /// recorded; operators poll this to find them.
    pub fn stuck_processing(&self, older_than: Duration) -> Result<Vec<Document>, LedgerError> {
        let threshold = i64::try_from(older_than.as_millis()).unwrap_or(i64::MAX);
        let cutoff = now_millis().saturating_sub(threshold);
        let conn = self.conn()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents d
             WHERE d.status = ?1 AND d.updated_at <= ?2
             ORDER BY d.updated_at ASC"
        ))?;

        let documents = stmt
            .query_map(
                params![DocumentStatus::Processing.as_str(), cutoff],
                row_to_document,
            )?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(documents)
    }

    /// Convert DocumentId to bytes for storage
    fn id_to_bytes(id: DocumentId) -> Vec<u8> {
        id.value().to_be_bytes().to_vec()
    }

    /// Convert bytes to DocumentId
    fn bytes_to_id(bytes: &[u8]) -> Result<DocumentId, LedgerError> {
        if bytes.len() != 16 {
            return Err(LedgerError::InvalidData(format!(
                "Expected 16 bytes for DocumentId, got {}",
                bytes.len()
            )));
        }
        let mut arr = [0u8; 16];
        arr.copy_from_slice(bytes);
        Ok(DocumentId::from_value(u128::from_be_bytes(arr)))
    }

    /// Read the status and failure reason of a document
    fn current_state(
        conn: &Connection,
        id: DocumentId,
    ) -> Result<(DocumentStatus, Option<String>), LedgerError> {
        let row: Option<(String, Option<String>)> = conn
            .query_row(
                "SELECT status, error_message FROM documents WHERE id = ?1",
                params![Self::id_to_bytes(id)],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let (status, error_message) = row.ok_or(LedgerError::NotFound(id))?;
        let status = DocumentStatus::parse(&status)
            .ok_or_else(|| LedgerError::InvalidData(format!("Unknown status: {}", status)))?;
        Ok((status, error_message))
    }
}

impl DocumentLedger for SqliteLedger {
    type Error = LedgerError;

    fn create(
        &self,
        original_filename: &str,
        storage_reference: &StorageReference,
    ) -> Result<DocumentId, Self::Error> {
        DocumentStatus::check_transition(None, DocumentStatus::Processing)?;

        let id = storage_reference.id();
        let now = now_millis();

        self.conn()?.execute(
            "INSERT INTO documents (id, original_filename, storage_url, status, created_at, updated_at, error_message)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5, NULL)",
            params![
                Self::id_to_bytes(id),
                original_filename,
                storage_reference.locator(),
                DocumentStatus::Processing.as_str(),
                now,
            ],
        )?;

        debug!(document_id = %id, "document created at processing");
        Ok(id)
    }

    fn attach_metadata_and_complete(
        &self,
        id: DocumentId,
        fields: &FieldMap,
    ) -> Result<(), Self::Error> {
        let core = serde_json::to_string(&fields_to_json(fields))?;
        let id_bytes = Self::id_to_bytes(id);
        let now = now_millis();

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let (current, _) = Self::current_state(&tx, id)?;
        DocumentStatus::check_transition(Some(current), DocumentStatus::Done)?;

        tx.execute(
            "INSERT INTO metadata_standard (document_id, core, created_at) VALUES (?1, ?2, ?3)",
            params![&id_bytes, core, now],
        )?;
        tx.execute(
            "UPDATE documents SET status = ?1, error_message = NULL, updated_at = ?2 WHERE id = ?3",
            params![DocumentStatus::Done.as_str(), now, &id_bytes],
        )?;
        tx.commit()?;

        debug!(document_id = %id, "metadata attached, document done");
        Ok(())
    }

    fn mark_failed(&self, id: DocumentId, error_message: &str) -> Result<(), Self::Error> {
        let id_bytes = Self::id_to_bytes(id);

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let (current, existing) = Self::current_state(&tx, id)?;
        if current == DocumentStatus::Failed {
            if existing.as_deref() == Some(error_message) {
                return Ok(());
            }
            tx.execute(
                "UPDATE documents SET error_message = ?1, updated_at = ?2 WHERE id = ?3",
                params![error_message, now_millis(), &id_bytes],
            )?;
        } else {
            DocumentStatus::check_transition(Some(current), DocumentStatus::Failed)?;
            tx.execute(
                "UPDATE documents SET status = ?1, error_message = ?2, updated_at = ?3 WHERE id = ?4",
                params![DocumentStatus::Failed.as_str(), error_message, now_millis(), &id_bytes],
            )?;
        }
        tx.commit()?;

        debug!(document_id = %id, "document marked failed");
        Ok(())
    }

    fn begin_reprocessing(&self, id: DocumentId) -> Result<(), Self::Error> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let (current, _) = Self::current_state(&tx, id)?;
        DocumentStatus::check_transition(Some(current), DocumentStatus::Processing)?;

        tx.execute(
            "UPDATE documents SET status = ?1, error_message = NULL, updated_at = ?2 WHERE id = ?3",
            params![DocumentStatus::Processing.as_str(), now_millis(), Self::id_to_bytes(id)],
        )?;
        tx.commit()?;

        debug!(document_id = %id, "document re-entered processing");
        Ok(())
    }

    fn get(&self, id: DocumentId) -> Result<Option<DocumentDetail>, Self::Error> {
        let conn = self.conn()?;

        let row = conn
            .query_row(
                &format!(
                    "SELECT {DOCUMENT_COLUMNS}, m.core
                     FROM documents d
                     LEFT JOIN metadata_standard m ON m.document_id = d.id
                     WHERE d.id = ?1"
                ),
                params![Self::id_to_bytes(id)],
                |row| Ok((row_to_document(row)?, row.get::<_, Option<String>>(7)?)),
            )
            .optional()?;

        let Some((document, core)) = row else {
            return Ok(None);
        };

        let metadata = match core {
            Some(json) => {
                let value: serde_json::Value = serde_json::from_str(&json)?;
                Some(MetadataRecord {
                    document_id: document.id,
                    fields: fields_from_json(&value).map_err(LedgerError::InvalidData)?,
                })
            }
            None => None,
        };

        Ok(Some(DocumentDetail { document, metadata }))
    }

    fn list(&self, page: Page) -> Result<Vec<Document>, Self::Error> {
        let page = page.clamp_to(self.config.max_list_limit);
        let offset = i64::try_from(page.offset()).unwrap_or(i64::MAX);
        let conn = self.conn()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents d
             ORDER BY d.created_at DESC, d.rowid DESC
             LIMIT ?1 OFFSET ?2"
        ))?;

        let documents = stmt
            .query_map(params![page.limit() as i64, offset], row_to_document)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(documents)
    }
}

/// Map a row selected with `DOCUMENT_COLUMNS` to a Document
fn row_to_document(row: &Row<'_>) -> rusqlite::Result<Document> {
    let id_bytes: Vec<u8> = row.get(0)?;
    let id = SqliteLedger::bytes_to_id(&id_bytes).map_err(|e| conversion_failure(0, e))?;

    let status: String = row.get(3)?;
    let status = DocumentStatus::parse(&status).ok_or_else(|| {
        conversion_failure(3, LedgerError::InvalidData(format!("Unknown status: {}", status)))
    })?;

    let storage_url: String = row.get(2)?;

    Ok(Document {
        id,
        original_filename: row.get(1)?,
        storage_reference: StorageReference::new(id, storage_url),
        status,
        created_at: millis_to_datetime(row.get(4)?).map_err(|e| conversion_failure(4, e))?,
        updated_at: millis_to_datetime(row.get(5)?).map_err(|e| conversion_failure(5, e))?,
        error_message: row.get(6)?,
    })
}

fn conversion_failure(column: usize, error: LedgerError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Blob, Box::new(error))
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

fn millis_to_datetime(millis: i64) -> Result<DateTime<Utc>, LedgerError> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| LedgerError::InvalidData(format!("Timestamp out of range: {}", millis)))
}
