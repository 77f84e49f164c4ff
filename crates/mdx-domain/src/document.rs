//! Document module - one ingested file and its lifecycle state

use crate::{DocumentStatus, MetadataRecord};
use chrono::{DateTime, Utc};
use std::fmt;

/// Unique identifier for a document, backed by a random UUIDv4
///
/// The same identifier names the stored blob and keys the ledger row, so
/// concurrent ingestions never contend on either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentId(u128);

impl DocumentId {
    /// Generate a new random DocumentId
    ///
    /// # Examples
    ///
    /// ```
    /// use mdx_domain::DocumentId;
    ///
    /// let a = DocumentId::new();
    /// let b = DocumentId::new();
    /// assert_ne!(a, b);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().as_u128())
    }

    /// Create a DocumentId from a raw u128 value
    ///
    /// This is primarily for storage layer deserialization.
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse a DocumentId from its hyphenated UUID form
    ///
    /// # Examples
    ///
    /// ```
    /// use mdx_domain::DocumentId;
    ///
    /// let id = DocumentId::new();
    /// let parsed = DocumentId::from_string(&id.to_string()).unwrap();
    /// assert_eq!(id, parsed);
    /// ```
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid document id: {}", e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

impl std::str::FromStr for DocumentId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s)
    }
}

/// Opaque locator for bytes held by a blob store
///
/// Carries the identifier allocated for the blob and a textual locator
/// (for the filesystem store, the absolute path of the file).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageReference {
    id: DocumentId,
    locator: String,
}

impl StorageReference {
    /// Create a reference from its parts
    pub fn new(id: DocumentId, locator: impl Into<String>) -> Self {
        Self {
            id,
            locator: locator.into(),
        }
    }

    /// Identifier the blob was stored under
    pub fn id(&self) -> DocumentId {
        self.id
    }

    /// Textual locator of the stored bytes
    pub fn locator(&self) -> &str {
        &self.locator
    }
}

impl fmt::Display for StorageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.locator)
    }
}

/// A document - one ingested file tracked by the ledger
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Unique identifier, assigned at creation
    pub id: DocumentId,

    /// User-supplied file name
    pub original_filename: String,

    /// Where the stored bytes live
    pub storage_reference: StorageReference,

    /// Current lifecycle status
    pub status: DocumentStatus,

    /// Set once at creation
    pub created_at: DateTime<Utc>,

    /// Bumped on every status transition
    pub updated_at: DateTime<Utc>,

    /// Failure reason; only set while the status is `failed`
    pub error_message: Option<String>,
}

/// A document together with its metadata record, if one exists
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentDetail {
    /// The document row
    pub document: Document,

    /// Extracted metadata; `None` until extraction has completed
    pub metadata: Option<MetadataRecord>,
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: Round-trip through string representation preserves ID
        #[test]
        fn test_id_string_roundtrip(value: u128) {
            let id = DocumentId::from_value(value);

            match DocumentId::from_string(&id.to_string()) {
                Ok(parsed) => prop_assert_eq!(id, parsed),
                Err(e) => return Err(TestCaseError::fail(e)),
            }
        }

        /// Property: Ordering is consistent with the underlying value
        #[test]
        fn test_id_ordering_property(a: u128, b: u128) {
            let id_a = DocumentId::from_value(a);
            let id_b = DocumentId::from_value(b);

            prop_assert_eq!(id_a < id_b, a < b);
            prop_assert_eq!(id_a == id_b, a == b);
        }
    }
}
