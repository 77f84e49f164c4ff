//! Ingest command implementation.

use crate::cli::IngestArgs;
use crate::config::OutputFormat;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::workspace::Workspace;
use mdx_domain::DocumentStatus;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Result of ingesting one file.
#[derive(Debug)]
pub enum IngestOutcome {
    /// Document reached `done`
    Ok {
        /// Source file
        path: PathBuf,
        /// Document ID
        id: String,
    },
    /// Document reached `failed`, or was never created
    Failed {
        /// Source file
        path: PathBuf,
        /// Failure reason
        reason: String,
    },
}

/// Execute the ingest command.
pub fn execute_ingest(
    args: IngestArgs,
    workspace: &Workspace,
    formatter: &Formatter,
) -> Result<()> {
    let inputs = collect_inputs(&args.input)?;
    if inputs.is_empty() {
        return Err(CliError::NoDocuments(args.input));
    }

    let outcomes = ingest_all(&inputs, workspace);

    let mut failed = 0;
    for outcome in &outcomes {
        match outcome {
            IngestOutcome::Ok { path, id } => match formatter.format() {
                OutputFormat::Quiet => println!("{}", id),
                _ => println!("{}", formatter.ingest_ok(path, id)),
            },
            IngestOutcome::Failed { path, reason } => {
                failed += 1;
                if formatter.format() != OutputFormat::Quiet {
                    println!("{}", formatter.ingest_failed(path, reason));
                }
            }
        }
    }

    if formatter.format() != OutputFormat::Quiet {
        let summary = format!(
            "{} file(s): {} ok, {} failed",
            outcomes.len(),
            outcomes.len() - failed,
            failed
        );
        if failed == 0 {
            println!("{}", formatter.info(&summary));
        } else {
            println!("{}", formatter.warning(&summary));
        }
    }

    Ok(())
}

/// Ingest each file in turn; one file's failure does not stop the rest.
pub fn ingest_all(inputs: &[PathBuf], workspace: &Workspace) -> Vec<IngestOutcome> {
    inputs
        .iter()
        .map(|path| {
            debug!(path = %path.display(), "ingesting");
            let result = workspace
                .pipeline
                .ingest_path(path)
                .map_err(CliError::from)
                .and_then(|id| workspace.query.get(id).map_err(CliError::from));

            match result {
                Ok(detail) if detail.document.status == DocumentStatus::Done.as_str() => {
                    IngestOutcome::Ok {
                        path: path.clone(),
                        id: detail.document.id,
                    }
                }
                Ok(detail) => IngestOutcome::Failed {
                    path: path.clone(),
                    reason: detail
                        .document
                        .error_message
                        .unwrap_or_else(|| format!("document left {}", detail.document.status)),
                },
                Err(e) => IngestOutcome::Failed {
                    path: path.clone(),
                    reason: e.to_string(),
                },
            }
        })
        .collect()
}

/// Files to ingest: the input itself, or every `.docx` beneath it in path order.
pub fn collect_inputs(input: &Path) -> Result<Vec<PathBuf>> {
    let metadata = fs::metadata(input)
        .map_err(|e| CliError::InvalidInput(format!("{}: {}", input.display(), e)))?;

    if metadata.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }

    let mut found = Vec::new();
    walk(input, &mut found)?;
    found.sort();
    Ok(found)
}

fn walk(dir: &Path, found: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let file_type = entry.file_type()?;

        if file_type.is_dir() {
            walk(&path, found)?;
        } else if file_type.is_file() && is_docx(&path) {
            found.push(path);
        }
    }
    Ok(())
}

fn is_docx(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("docx"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdx_extractor::fixtures::DocxBuilder;
    use tempfile::TempDir;

    fn open_workspace(dir: &TempDir) -> Workspace {
        Workspace::open(&dir.path().join("mdx.db"), &dir.path().join("uploads")).unwrap()
    }

    #[test]
    fn test_collect_inputs_recurses_and_sorts() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("in");
        fs::create_dir_all(root.join("sub/deeper")).unwrap();
        fs::write(root.join("b.docx"), b"").unwrap();
        fs::write(root.join("a.DOCX"), b"").unwrap();
        fs::write(root.join("notes.txt"), b"").unwrap();
        fs::write(root.join("sub/deeper/c.docx"), b"").unwrap();

        let found = collect_inputs(&root).unwrap();
        let names: Vec<PathBuf> = found
            .iter()
            .map(|p| p.strip_prefix(&root).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            names,
            vec![
                PathBuf::from("a.DOCX"),
                PathBuf::from("b.docx"),
                PathBuf::from("sub/deeper/c.docx"),
            ]
        );
    }

    #[test]
    fn test_collect_inputs_single_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("only.bin");
        fs::write(&file, b"x").unwrap();

        assert_eq!(collect_inputs(&file).unwrap(), vec![file]);
    }

    #[test]
    fn test_collect_inputs_missing_path() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            collect_inputs(&dir.path().join("missing")),
            Err(CliError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_ingest_all_reports_each_file() {
        let dir = TempDir::new().unwrap();
        let workspace = open_workspace(&dir);
        let good = dir.path().join("good.docx");
        let bad = dir.path().join("bad.docx");
        DocxBuilder::new().title("Good").write_to(&good).unwrap();
        fs::write(&bad, b"").unwrap();

        let outcomes = ingest_all(&[bad.clone(), good.clone()], &workspace);

        assert_eq!(outcomes.len(), 2);
        assert!(matches!(
            &outcomes[0],
            IngestOutcome::Failed { path, reason } if path == &bad && !reason.is_empty()
        ));
        assert!(matches!(&outcomes[1], IngestOutcome::Ok { path, .. } if path == &good));

        let page = workspace.query.list(None, None).unwrap();
        assert_eq!(page.items.len(), 2);
    }

    #[test]
    fn test_empty_folder_is_error() {
        let dir = TempDir::new().unwrap();
        let workspace = open_workspace(&dir);
        let empty = dir.path().join("empty");
        fs::create_dir_all(&empty).unwrap();

        let formatter = Formatter::new(OutputFormat::Table, false);
        let result = execute_ingest(IngestArgs { input: empty }, &workspace, &formatter);
        assert!(matches!(result, Err(CliError::NoDocuments(_))));
    }
}
