//! Metadata module - the core fields extracted from a document

use crate::DocumentId;
use std::collections::BTreeMap;
use std::fmt;

/// Kind of value a core field carries in the source document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Free text
    Text,
    /// Date/time, normalized to ISO-8601 on extraction
    DateTime,
    /// Integer counter
    Integer,
}

/// One of the fixed, enumerated core metadata fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CoreField {
    /// Primary author
    Author,
    /// Document title
    Title,
    /// Topic of the content
    Subject,
    /// Free-form category
    Category,
    /// Description or comments
    Comments,
    /// Status such as "Draft" or "Final"
    ContentStatus,
    /// Creation time
    Created,
    /// Unambiguous reference to the resource
    Identifier,
    /// Keywords for search
    Keywords,
    /// Language of the content
    Language,
    /// Last person to modify the document
    LastModifiedBy,
    /// Last print time
    LastPrinted,
    /// Last modification time
    Modified,
    /// Revision number
    Revision,
    /// Version string
    Version,
}

impl CoreField {
    /// Every core field, in canonical order
    pub const ALL: [CoreField; 15] = [
        CoreField::Author,
        CoreField::Title,
        CoreField::Subject,
        CoreField::Category,
        CoreField::Comments,
        CoreField::ContentStatus,
        CoreField::Created,
        CoreField::Identifier,
        CoreField::Keywords,
        CoreField::Language,
        CoreField::LastModifiedBy,
        CoreField::LastPrinted,
        CoreField::Modified,
        CoreField::Revision,
        CoreField::Version,
    ];

    /// Key used in field maps and their JSON form
    pub fn name(&self) -> &'static str {
        match self {
            CoreField::Author => "author",
            CoreField::Title => "title",
            CoreField::Subject => "subject",
            CoreField::Category => "category",
            CoreField::Comments => "comments",
            CoreField::ContentStatus => "content_status",
            CoreField::Created => "created",
            CoreField::Identifier => "identifier",
            CoreField::Keywords => "keywords",
            CoreField::Language => "language",
            CoreField::LastModifiedBy => "last_modified_by",
            CoreField::LastPrinted => "last_printed",
            CoreField::Modified => "modified",
            CoreField::Revision => "revision",
            CoreField::Version => "version",
        }
    }

    /// Parse a field from its key
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.name() == name)
    }

    /// Local name of the element carrying this field in `docProps/core.xml`
    pub fn element(&self) -> &'static str {
        match self {
            CoreField::Author => "creator",
            CoreField::Title => "title",
            CoreField::Subject => "subject",
            CoreField::Category => "category",
            CoreField::Comments => "description",
            CoreField::ContentStatus => "contentStatus",
            CoreField::Created => "created",
            CoreField::Identifier => "identifier",
            CoreField::Keywords => "keywords",
            CoreField::Language => "language",
            CoreField::LastModifiedBy => "lastModifiedBy",
            CoreField::LastPrinted => "lastPrinted",
            CoreField::Modified => "modified",
            CoreField::Revision => "revision",
            CoreField::Version => "version",
        }
    }

    /// Find the field carried by an element local name
    pub fn from_element(local_name: &[u8]) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.element().as_bytes() == local_name)
    }

    /// Value kind of the field
    pub fn kind(&self) -> FieldKind {
        match self {
            CoreField::Created | CoreField::LastPrinted | CoreField::Modified => {
                FieldKind::DateTime
            }
            CoreField::Revision => FieldKind::Integer,
            _ => FieldKind::Text,
        }
    }
}

impl fmt::Display for CoreField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Scalar value of a core field
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldValue {
    /// Text, passed through unchanged
    Text(String),
    /// Integer value
    Integer(i64),
    /// ISO-8601 timestamp
    Timestamp(String),
    /// The property does not exist on the source document
    Absent,
}

impl FieldValue {
    /// Whether the source document lacked this property
    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Absent)
    }

    /// Text form of the value, if it has one
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) | FieldValue::Timestamp(s) => Some(s),
            _ => None,
        }
    }
}

/// Complete map of core fields to values
///
/// Every [`CoreField`] always has an entry, so consumers can distinguish
/// "not present in the source" (`Absent`) from "not extracted" (no map).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMap {
    fields: BTreeMap<CoreField, FieldValue>,
}

impl FieldMap {
    /// Create a map with every field absent
    ///
    /// # Examples
    ///
    /// ```
    /// use mdx_domain::{CoreField, FieldMap, FieldValue};
    ///
    /// let mut map = FieldMap::absent();
    /// map.set(CoreField::Title, FieldValue::Text("Report".into()));
    ///
    /// assert_eq!(map.len(), 15);
    /// assert_eq!(map.get(CoreField::Title).as_text(), Some("Report"));
    /// assert!(map.get(CoreField::Author).is_absent());
    /// ```
    pub fn absent() -> Self {
        Self {
            fields: CoreField::ALL
                .iter()
                .map(|f| (*f, FieldValue::Absent))
                .collect(),
        }
    }

    /// Set the value of a field
    pub fn set(&mut self, field: CoreField, value: FieldValue) {
        self.fields.insert(field, value);
    }

    /// Get the value of a field
    pub fn get(&self, field: CoreField) -> &FieldValue {
        // Every field is inserted by `absent()` and never removed
        self.fields.get(&field).unwrap_or(&FieldValue::Absent)
    }

    /// Iterate fields in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (CoreField, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (*k, v))
    }

    /// Number of entries (always the number of core fields)
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Number of fields the source document actually carried
    pub fn present_count(&self) -> usize {
        self.fields.values().filter(|v| !v.is_absent()).count()
    }
}

impl Default for FieldMap {
    fn default() -> Self {
        Self::absent()
    }
}

/// Extracted metadata attached to a completed document
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataRecord {
    /// Owning document
    pub document_id: DocumentId,

    /// Extracted core fields
    pub fields: FieldMap,
}
