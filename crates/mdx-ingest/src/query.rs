//! Read-only views over the ledger

use crate::QueryError;
use chrono::{DateTime, SecondsFormat, Utc};
use mdx_domain::page::{DEFAULT_LIMIT, MAX_LIMIT};
use mdx_domain::traits::DocumentLedger;
use mdx_domain::{Document, DocumentDetail, DocumentId, Page};
use mdx_store::codec::fields_to_json;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::Display;
use std::sync::Arc;

/// Public form of a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentView {
    /// Document id
    pub id: String,
    /// User-supplied file name
    pub original_filename: String,
    /// Where the stored bytes live
    pub storage_url: String,
    /// Lifecycle status
    pub status: String,
    /// RFC 3339 creation time
    pub created_at: String,
    /// RFC 3339 time of the last transition
    pub updated_at: String,
    /// Failure reason while failed
    pub error_message: Option<String>,
}

impl From<&Document> for DocumentView {
    fn from(doc: &Document) -> Self {
        Self {
            id: doc.id.to_string(),
            original_filename: doc.original_filename.clone(),
            storage_url: doc.storage_reference.locator().to_string(),
            status: doc.status.as_str().to_string(),
            created_at: timestamp(&doc.created_at),
            updated_at: timestamp(&doc.updated_at),
            error_message: doc.error_message.clone(),
        }
    }
}

/// A document with its extracted core fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentDetailView {
    /// The document
    #[serde(flatten)]
    pub document: DocumentView,
    /// Core fields; an empty object until extraction has completed
    pub core: Value,
}

impl From<&DocumentDetail> for DocumentDetailView {
    fn from(detail: &DocumentDetail) -> Self {
        Self {
            document: DocumentView::from(&detail.document),
            core: detail
                .metadata
                .as_ref()
                .map(|record| fields_to_json(&record.fields))
                .unwrap_or_else(|| Value::Object(Map::new())),
        }
    }
}

/// One page of documents, most recently created first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentPage {
    /// Documents on this page
    pub items: Vec<DocumentView>,
    /// Limit actually applied
    pub limit: u32,
    /// Offset actually applied
    pub offset: u64,
}

fn timestamp(t: &DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Read-only access to documents for outer surfaces
pub struct QuerySurface<L> {
    ledger: Arc<L>,
    max_limit: u32,
}

impl<L> QuerySurface<L>
where
    L: DocumentLedger,
    L::Error: Display,
{
    /// Create a query surface over a shared ledger
    pub fn new(ledger: Arc<L>) -> Self {
        Self {
            ledger,
            max_limit: MAX_LIMIT,
        }
    }

    /// Set the largest page size `list` will return
    pub fn with_max_limit(mut self, max_limit: u32) -> Self {
        self.max_limit = max_limit.max(1);
        self
    }

    /// Largest page size `list` will return
    pub fn max_limit(&self) -> u32 {
        self.max_limit
    }

    /// Get one document with its core fields
    pub fn get(&self, id: DocumentId) -> Result<DocumentDetailView, QueryError> {
        let detail = self
            .ledger
            .get(id)
            .map_err(|e| QueryError::Ledger(e.to_string()))?
            .ok_or(QueryError::NotFound(id))?;
        Ok(DocumentDetailView::from(&detail))
    }

    /// List documents, newest first
    ///
    /// Missing parameters default to 20 and 0; the limit is clamped to
    /// `[1, max_limit]`.
    pub fn list(
        &self,
        limit: Option<u32>,
        offset: Option<u64>,
    ) -> Result<DocumentPage, QueryError> {
        let page = Page::bounded(
            limit.unwrap_or(DEFAULT_LIMIT),
            offset.unwrap_or(0),
            self.max_limit,
        );

        let documents = self
            .ledger
            .list(page)
            .map_err(|e| QueryError::Ledger(e.to_string()))?;

        Ok(DocumentPage {
            items: documents.iter().map(DocumentView::from).collect(),
            limit: page.limit(),
            offset: page.offset(),
        })
    }
}

impl<L> Clone for QuerySurface<L> {
    fn clone(&self) -> Self {
        Self {
            ledger: Arc::clone(&self.ledger),
            max_limit: self.max_limit,
        }
    }
}
