//! In-memory `.docx` builders for tests
//!
//! Produces minimal but valid word-processing packages: content types,
//! package relationships, a one-paragraph body and, optionally, a core
//! properties part.

use crate::extractor::{CONTENT_TYPES_PART, CORE_PROPERTIES_PART, WORDPROCESSING_MAIN_TYPE};
use mdx_domain::CoreField;
use quick_xml::escape::escape;
use std::io::{Cursor, Write};
use std::path::Path;
use zip::result::ZipResult;
use zip::write::FileOptions;
use zip::ZipWriter;

const RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/></Relationships>"#;

/// Builder for a `.docx` package
#[derive(Debug, Clone)]
pub struct DocxBuilder {
    properties: Vec<(CoreField, String)>,
    core_xml: Option<String>,
    include_core: bool,
    content_types: Option<String>,
    include_content_types: bool,
    body: String,
}

impl Default for DocxBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DocxBuilder {
    /// A document with a body and an empty core properties part
    pub fn new() -> Self {
        Self {
            properties: Vec::new(),
            core_xml: None,
            include_core: true,
            content_types: None,
            include_content_types: true,
            body: "Hello".to_string(),
        }
    }

    /// Set a core property to raw element text
    pub fn property(mut self, field: CoreField, value: impl Into<String>) -> Self {
        self.properties.push((field, value.into()));
        self
    }

    /// Set the title
    pub fn title(self, title: impl Into<String>) -> Self {
        self.property(CoreField::Title, title)
    }

    /// Set the author
    pub fn author(self, author: impl Into<String>) -> Self {
        self.property(CoreField::Author, author)
    }

    /// Replace the generated core properties part with raw text
    pub fn raw_core_xml(mut self, xml: impl Into<String>) -> Self {
        self.core_xml = Some(xml.into());
        self
    }

    /// Leave the core properties part out of the package
    pub fn without_core_properties(mut self) -> Self {
        self.include_core = false;
        self
    }

    /// Replace the generated content types part with raw text
    pub fn raw_content_types(mut self, xml: impl Into<String>) -> Self {
        self.content_types = Some(xml.into());
        self
    }

    /// Leave the content types part out of the package
    pub fn without_content_types(mut self) -> Self {
        self.include_content_types = false;
        self
    }

    /// Set the body paragraph text
    pub fn body(mut self, text: impl Into<String>) -> Self {
        self.body = text.into();
        self
    }

    /// Build the package bytes
    pub fn build(&self) -> ZipResult<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options: FileOptions<()> = FileOptions::default();

        if self.include_content_types {
            let content_types = self
                .content_types
                .clone()
                .unwrap_or_else(|| default_content_types(self.include_core));
            zip.start_file(CONTENT_TYPES_PART, options)?;
            zip.write_all(content_types.as_bytes())?;
        }

        zip.start_file("_rels/.rels", options)?;
        zip.write_all(RELS.as_bytes())?;

        zip.start_file("word/document.xml", options)?;
        zip.write_all(document_xml(&self.body).as_bytes())?;

        if self.include_core {
            let core = self
                .core_xml
                .clone()
                .unwrap_or_else(|| core_properties_xml(&self.properties));
            zip.start_file(CORE_PROPERTIES_PART, options)?;
            zip.write_all(core.as_bytes())?;
        }

        Ok(zip.finish()?.into_inner())
    }

    /// Build the package and write it to `path`
    pub fn write_to(&self, path: &Path) -> ZipResult<()> {
        std::fs::write(path, self.build()?)?;
        Ok(())
    }
}

/// Core properties XML carrying the given fields
pub fn core_properties_xml(properties: &[(CoreField, String)]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
    );
    for (field, value) in properties {
        let name = format!("{}:{}", prefix(*field), field.element());
        let attrs = match field {
            CoreField::Created | CoreField::Modified => r#" xsi:type="dcterms:W3CDTF""#,
            _ => "",
        };
        xml.push_str(&format!("<{name}{attrs}>{}</{name}>", escape(value.as_str())));
    }
    xml.push_str("</cp:coreProperties>");
    xml
}

fn prefix(field: CoreField) -> &'static str {
    match field {
        CoreField::Author
        | CoreField::Title
        | CoreField::Subject
        | CoreField::Comments
        | CoreField::Identifier
        | CoreField::Language => "dc",
        CoreField::Created | CoreField::Modified => "dcterms",
        _ => "cp",
    }
}

fn default_content_types(include_core: bool) -> String {
    let core = if include_core {
        r#"<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>"#
    } else {
        ""
    };
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="{WORDPROCESSING_MAIN_TYPE}"/>{core}</Types>"#
    )
}

fn document_xml(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p><w:r><w:t>{}</w:t></w:r></w:p></w:body></w:document>"#,
        escape(body)
    )
}
