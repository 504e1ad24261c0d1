use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use super::{DedupStore, write_atomic};
use crate::document::{document_filename, encode_conversation};
use crate::models::Conversation;
use crate::tagger::generate_tags;

/// Writes conversations into one collection, skipping ids it already holds
#[derive(Debug)]
pub struct CollectionWriter {
    root: PathBuf,
    dedup: DedupStore,
}

impl CollectionWriter {
    /// Create the collection directory if needed and load its dedup state
    pub fn open(root: &Path) -> Result<Self> {
        fs::create_dir_all(root)
            .with_context(|| format!("Failed to create collection {}", root.display()))?;
        let dedup = DedupStore::scan(root)?;
        Ok(Self { root: root.to_path_buf(), dedup })
    }

    pub fn dedup(&self) -> &DedupStore {
        &self.dedup
    }

    /// Forget ids marked in memory and rescan the collection
    pub fn reset(&mut self) -> Result<()> {
        self.dedup.reset()
    }

    /// Tag, encode and persist one conversation
    ///
    /// Returns `Ok(None)` when the id is already in the collection. On failure the
    /// id is released again so a retry can write it.
    pub fn write(&mut self, mut conversation: Conversation) -> Result<Option<PathBuf>> {
        if !self.dedup.mark(&conversation.id) {
            tracing::debug!(id = %conversation.id, "Already in collection, skipping");
            return Ok(None);
        }

        let body = conversation.body_text();
        let mut tags = generate_tags(
            conversation.source,
            conversation.date.date_naive(),
            conversation.model.as_deref(),
            Some(&body),
        );
        if let Some(existing) = conversation.tags.take() {
            tags.extend(existing);
        }
        conversation.tags = Some(tags);

        match self.persist(&conversation) {
            Ok(path) => {
                tracing::debug!(id = %conversation.id, path = %path.display(), "Wrote document");
                Ok(Some(path))
            }
            Err(e) => {
                self.dedup.unmark(&conversation.id);
                Err(e)
            }
        }
    }

    fn persist(&self, conversation: &Conversation) -> Result<PathBuf> {
        let markdown = encode_conversation(conversation)
            .with_context(|| format!("Failed to encode conversation {}", conversation.id))?;
        let path = self.root.join(document_filename(conversation));
        if path.exists() {
            bail!(
                "Refusing to overwrite {} while writing conversation {}",
                path.display(),
                conversation.id
            );
        }
        write_atomic(&path, &markdown)?;
        Ok(path)
    }
}

/// Write one conversation to the collection at `root`
///
/// Dedup state is scanned from disk on every call. Batch callers should keep
/// a [`CollectionWriter`] open instead.
pub fn write_to_collection(conversation: Conversation, root: &Path) -> Result<Option<PathBuf>> {
    CollectionWriter::open(root)?.write(conversation)
}
