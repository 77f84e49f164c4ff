//! Error types for the Extractor

use thiserror::Error;

/// Errors that can occur during extraction
///
/// Every variant means "extraction failed"; the `Display` text is what ends up
/// recorded on the document.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// File not found or unreadable
    #[error("Cannot read file: {0}")]
    Io(#[from] std::io::Error),

    /// Not a ZIP archive, or a corrupt one
    #[error("Invalid archive: {0}")]
    InvalidArchive(String),

    /// A ZIP archive that is not a word-processing document
    #[error("Not a word-processing document: {0}")]
    NotADocument(String),

    /// Core properties part exceeds the configured bound
    #[error("Core properties too large: {size} bytes (max: {limit})")]
    CorePropertiesTooLarge {
        /// Declared or observed size
        size: u64,
        /// Configured maximum
        limit: u64,
    },

    /// Core properties part is not well-formed XML
    #[error("Malformed core properties: {0}")]
    MalformedXml(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<zip::result::ZipError> for ExtractionError {
    fn from(e: zip::result::ZipError) -> Self {
        match e {
            zip::result::ZipError::Io(io) => ExtractionError::Io(io),
            other => ExtractionError::InvalidArchive(other.to_string()),
        }
    }
}

impl From<quick_xml::Error> for ExtractionError {
    fn from(e: quick_xml::Error) -> Self {
        ExtractionError::MalformedXml(e.to_string())
    }
}
