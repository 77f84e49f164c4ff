//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use mdx_ingest::{DocumentDetailView, DocumentView};
use serde_json::Value;
use std::path::Path;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Active output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format a list of documents.
    pub fn format_documents(&self, documents: &[DocumentView]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(documents)?),
            OutputFormat::Table => Ok(self.format_documents_table(documents)),
            OutputFormat::Quiet => Ok(documents
                .iter()
                .map(|d| d.id.as_str())
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    /// Format documents as a table.
    fn format_documents_table(&self, documents: &[DocumentView]) -> String {
        if documents.is_empty() {
            return self.colorize("No documents found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["ID", "Filename", "Status", "Created", "Error"]);

        for doc in documents {
            builder.push_record([
                doc.id.as_str(),
                doc.original_filename.as_str(),
                &self.status(&doc.status),
                doc.created_at.as_str(),
                doc.error_message.as_deref().unwrap_or(""),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format one document with its core fields.
    pub fn format_detail(&self, detail: &DocumentDetailView) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(detail)?),
            OutputFormat::Quiet => Ok(detail.document.id.clone()),
            OutputFormat::Table => Ok(self.format_detail_table(detail)),
        }
    }

    /// Format a document as a two-column table, present core fields last.
    fn format_detail_table(&self, detail: &DocumentDetailView) -> String {
        let doc = &detail.document;
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        builder.push_record(["id", doc.id.as_str()]);
        builder.push_record(["filename", doc.original_filename.as_str()]);
        builder.push_record(["status", &self.status(&doc.status)]);
        builder.push_record(["stored at", doc.storage_url.as_str()]);
        builder.push_record(["created", doc.created_at.as_str()]);
        builder.push_record(["updated", doc.updated_at.as_str()]);
        if let Some(message) = &doc.error_message {
            builder.push_record(["error", message.as_str()]);
        }

        if let Value::Object(core) = &detail.core {
            for (key, value) in core {
                let text = match value {
                    Value::Null => continue,
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                builder.push_record([key.as_str(), text.as_str()]);
            }
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Line for a file that ingested cleanly.
    pub fn ingest_ok(&self, path: &Path, id: &str) -> String {
        self.colorize(&format!("OK {} -> {}", path.display(), id), "green")
    }

    /// Line for a file that did not.
    pub fn ingest_failed(&self, path: &Path, reason: &str) -> String {
        self.colorize(&format!("FAILED {}: {}", path.display(), reason), "red")
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Status with its color.
    fn status(&self, status: &str) -> String {
        let color = match status {
            "done" => "green",
            "failed" => "red",
            "processing" => "yellow",
            _ => "cyan",
        };
        self.colorize(status, color)
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}
