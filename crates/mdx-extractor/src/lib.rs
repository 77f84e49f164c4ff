//! MDExtractor Extractor
//!
//! Reads the core properties (author, title, dates, revision and the rest of
//! the Dublin Core set) out of `.docx` files.
//!
//! # Overview
//!
//! A `.docx` file is a ZIP package of XML parts. The extractor checks the
//! package declares a word-processing main part, then parses only
//! `docProps/core.xml` into a complete [`FieldMap`](mdx_domain::FieldMap):
//! every core field has an entry, and fields the file does not carry are
//! explicitly absent.
//!
//! # Example Usage
//!
//! ```no_run
//! use mdx_domain::traits::MetadataExtractor;
//! use mdx_domain::CoreField;
//! use mdx_extractor::{DocxExtractor, ExtractorConfig};
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let extractor = DocxExtractor::new(ExtractorConfig::default())?;
//! let fields = extractor.extract(Path::new("report.docx"))?;
//!
//! println!("Title: {:?}", fields.get(CoreField::Title));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
pub mod parser;

#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;


pub use config::ExtractorConfig;
pub use error::ExtractionError;
pub use extractor::{
    DocxExtractor, CONTENT_TYPES_PART, CORE_PROPERTIES_PART, WORDPROCESSING_MAIN_TYPE,
};
