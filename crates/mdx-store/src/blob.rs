//! Filesystem blob store
//!
//! Files land under `<root>/<document-id>[.<ext>]`. Only the extension of the
//! user-supplied name is ever used, so no caller-controlled path segment
//! reaches the filesystem.

use crate::BlobError;
use mdx_domain::traits::BlobStore;
use mdx_domain::{DocumentId, StorageReference};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Longest extension kept from a name hint
const MAX_EXTENSION_LEN: usize = 16;

/// Blob store writing one file per document under a root directory
///
/// Writes go to a temporary file inside the root and are renamed into place
/// only once the whole stream is on disk, so readers never see a partial file.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    /// Create a store rooted at `root`, creating the directory if needed
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, BlobError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        let root = root.canonicalize()?;
        Ok(Self { root })
    }

    /// Root directory of the store
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File name for a blob: the id plus the sanitized extension of the hint
    fn file_name(id: DocumentId, name_hint: &str) -> String {
        match sanitized_extension(name_hint) {
            Some(ext) => format!("{}.{}", id, ext),
            None => id.to_string(),
        }
    }
}

/// Lowercased extension of the final path component, if it is short and alphanumeric
fn sanitized_extension(name_hint: &str) -> Option<String> {
    let last = name_hint.rsplit(|c| c == '/' || c == '\\').next()?;
    let ext = Path::new(last).extension()?.to_str()?;

    let valid = !ext.is_empty()
        && ext.len() <= MAX_EXTENSION_LEN
        && ext.chars().all(|c| c.is_ascii_alphanumeric());
    valid.then(|| ext.to_ascii_lowercase())
}

impl BlobStore for FsBlobStore {
    type Error = BlobError;

    fn store(
        &self,
        name_hint: &str,
        reader: &mut dyn Read,
    ) -> Result<StorageReference, Self::Error> {
        if name_hint.trim().is_empty() {
            return Err(BlobError::MissingFilename);
        }

        let id = DocumentId::new();
        let target = self.root.join(Self::file_name(id, name_hint));

        // Dropping the temp file on any error path removes it
        let mut temp = tempfile::Builder::new()
            .prefix(".incoming-")
            .tempfile_in(&self.root)?;
        let size = io::copy(reader, temp.as_file_mut())?;
        temp.as_file_mut().flush()?;
        temp.as_file().sync_all()?;
        temp.persist(&target).map_err(|e| BlobError::Io(e.error))?;

        debug!(document_id = %id, path = %target.display(), size, "blob stored");
        Ok(StorageReference::new(id, target.to_string_lossy()))
    }

    fn remove(&self, reference: &StorageReference) -> Result<(), Self::Error> {
        match fs::remove_file(self.path(reference)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BlobError::Io(e)),
        }
    }

    fn path(&self, reference: &StorageReference) -> PathBuf {
        PathBuf::from(reference.locator())
    }
}
