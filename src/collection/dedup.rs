use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::Result;

use super::{list_documents, read_document};

/// Set of conversation ids already present in a collection
///
/// Built from the headers on disk, so a fresh process always sees the same
/// state. Ids marked during a run are kept in memory until [`reset`](Self::reset).
#[derive(Debug)]
pub struct DedupStore {
    root: PathBuf,
    known: HashSet<String>,
}

impl DedupStore {
    pub fn scan(root: &Path) -> Result<Self> {
        let mut store = Self { root: root.to_path_buf(), known: HashSet::new() };
        store.load()?;
        Ok(store)
    }

    fn load(&mut self) -> Result<()> {
        for path in list_documents(&self.root)? {
            if let Some((_, document)) = read_document(&path)? {
                self.known.insert(document.header.id);
            }
        }
        tracing::debug!(root = %self.root.display(), ids = self.known.len(), "Dedup store loaded");
        Ok(())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.known.contains(id)
    }

    /// Record an id; returns false if it was already known
    pub fn mark(&mut self, id: &str) -> bool {
        self.known.insert(id.to_string())
    }

    /// Forget an id marked for a write that did not happen
    pub fn unmark(&mut self, id: &str) {
        self.known.remove(id);
    }

    /// Drop in-memory state and rebuild from disk
    pub fn reset(&mut self) -> Result<()> {
        self.known.clear();
        self.load()
    }

    pub fn len(&self) -> usize {
        self.known.len()
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }
}
