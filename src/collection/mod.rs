//! On-disk collection of documents.
//!
//! A collection is a flat directory of `.md` documents. Nothing besides the
//! documents is persisted: the [`DedupStore`] is rebuilt by scanning headers.

pub mod dedup;
pub mod writer;

pub use dedup::DedupStore;
pub use writer::{CollectionWriter, write_to_collection};

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::document::{Document, decode_document};

const DOCUMENT_EXTENSION: &str = "md";

/// All documents in the collection, sorted by file name
///
/// A missing directory is an empty collection. Hidden files (including the
/// writer's temp files) are ignored.
pub fn list_documents(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        return Ok(Vec::new());
    }

    let mut documents = Vec::new();
    let entries = fs::read_dir(root)
        .with_context(|| format!("Failed to read collection {}", root.display()))?;
    for entry in entries {
        let path = entry
            .with_context(|| format!("Failed to read entry in {}", root.display()))?
            .path();
        let hidden = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_none_or(|n| n.starts_with('.'));
        let markdown = path.extension().is_some_and(|ext| ext == DOCUMENT_EXTENSION);
        if path.is_file() && !hidden && markdown {
            documents.push(path);
        }
    }
    documents.sort();
    Ok(documents)
}

/// Read and decode one document
///
/// Returns `Ok(None)` (with a warning) when the file is not UTF-8 or not a
/// valid document; I/O failures are errors.
pub fn read_document(path: &Path) -> Result<Option<(String, Document)>> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Skipping non-UTF-8 file");
            return Ok(None);
        }
    };
    match decode_document(&text) {
        Ok(document) => Ok(Some((text, document))),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Skipping undecodable document");
            Ok(None)
        }
    }
}

/// Write through a hidden temp file and rename into place
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("Invalid document path {}", path.display()))?;
    let temp = path.with_file_name(format!(".{}.tmp", file_name));

    let result = fs::write(&temp, contents)
        .with_context(|| format!("Failed to write temp file {}", temp.display()))
        .and_then(|()| {
            fs::rename(&temp, path)
                .with_context(|| format!("Failed to move {} into place", path.display()))
        });
    if result.is_err() {
        let _ = fs::remove_file(&temp);
    }
    result
}
