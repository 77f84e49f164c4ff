//! Core Extractor implementation

use crate::config::ExtractorConfig;
use crate::error::ExtractionError;
use crate::parser::{declares_content_type, parse_core_properties};
use mdx_domain::traits::MetadataExtractor;
use mdx_domain::FieldMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use tracing::debug;
use zip::result::ZipError;
use zip::ZipArchive;

/// Package part listing the content type of every other part
pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

/// Package part carrying the core properties
pub const CORE_PROPERTIES_PART: &str = "docProps/core.xml";

/// Content type of the main part of a word-processing document
pub const WORDPROCESSING_MAIN_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";

/// Reads core properties out of `.docx` packages
///
/// Only the content-types and core-properties parts are decompressed, each
/// bounded by [`ExtractorConfig::max_core_properties_bytes`], so the cost of an
/// extraction does not grow with the document body.
#[derive(Debug, Clone, Default)]
pub struct DocxExtractor {
    config: ExtractorConfig,
}

impl DocxExtractor {
    /// Create an extractor with a validated configuration
    pub fn new(config: ExtractorConfig) -> Result<Self, ExtractionError> {
        config.validate().map_err(ExtractionError::Config)?;
        Ok(Self { config })
    }

    /// Create an extractor with the default configuration
    pub fn default_config() -> Self {
        Self::default()
    }

    /// Active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract core properties from any seekable package stream
    pub fn extract_from_reader<R: Read + Seek>(
        &self,
        reader: R,
    ) -> Result<FieldMap, ExtractionError> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| ExtractionError::InvalidArchive(e.to_string()))?;
        let limit = self.config.max_core_properties_bytes;

        let content_types = read_part(&mut archive, CONTENT_TYPES_PART, limit)?.ok_or_else(|| {
            ExtractionError::NotADocument(format!("missing {}", CONTENT_TYPES_PART))
        })?;
        if !declares_content_type(&content_types, WORDPROCESSING_MAIN_TYPE)? {
            return Err(ExtractionError::NotADocument(
                "no word-processing main part".to_string(),
            ));
        }

        match read_part(&mut archive, CORE_PROPERTIES_PART, limit)? {
            Some(xml) => parse_core_properties(&xml),
            None => {
                debug!("package has no core properties part");
                Ok(FieldMap::absent())
            }
        }
    }
}

impl MetadataExtractor for DocxExtractor {
    type Error = ExtractionError;

    fn extract(&self, path: &Path) -> Result<FieldMap, Self::Error> {
        let file = File::open(path)?;
        let fields = self.extract_from_reader(BufReader::new(file))?;

        debug!(
            path = %path.display(),
            present = fields.present_count(),
            "core properties extracted"
        );
        Ok(fields)
    }
}

/// Read a package part as UTF-8 text, refusing anything over `limit` bytes
///
/// Returns `None` when the part does not exist.
fn read_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
    limit: u64,
) -> Result<Option<String>, ExtractionError> {
    let entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let declared = entry.size();
    if declared > limit {
        return Err(ExtractionError::CorePropertiesTooLarge {
            size: declared,
            limit,
        });
    }

    // The header size is not trusted; cap the decompressed stream as well
    let mut bytes = Vec::new();
    entry
        .take(limit + 1)
        .read_to_end(&mut bytes)
        .map_err(|e| ExtractionError::InvalidArchive(format!("{}: {}", name, e)))?;
    if bytes.len() as u64 > limit {
        return Err(ExtractionError::CorePropertiesTooLarge {
            size: bytes.len() as u64,
            limit,
        });
    }

    let text = String::from_utf8(bytes)
        .map_err(|e| ExtractionError::MalformedXml(format!("{}: {}", name, e)))?;
    Ok(Some(text.trim_start_matches('\u{feff}').to_string()))
}
