//! Related-document links.
//!
//! [`relink_collection`] scores every pair of documents by shared tags and
//! rewrites each document's `## Related` section with its closest peers. All
//! documents are read and scored before anything is written.

pub mod related;
pub mod similarity;

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::collection::{list_documents, read_document, write_atomic};
use crate::models::TagSet;
use crate::utils::file_stem;
use related::{link_reference, render_links, splice_related};
use similarity::rank_related;

struct LinkedDocument {
    path: PathBuf,
    text: String,
    body_start: usize,
    tags: TagSet,
    reference: String,
}

fn load(root: &Path) -> Result<Vec<LinkedDocument>> {
    let mut documents = Vec::new();
    for path in list_documents(root)? {
        let Some((text, document)) = read_document(&path)? else { continue };

        let stem = file_stem(&path);
        let reference = document
            .title()
            .map(link_reference)
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| link_reference(&stem));
        let body_start = text.len() - document.body.len();

        documents.push(LinkedDocument {
            path,
            text,
            body_start,
            tags: document.header.tags,
            reference,
        });
    }
    Ok(documents)
}

/// Rewrite the Related section of every document that has related peers
///
/// Returns how many documents changed on disk. Documents without peers, or
/// whose Related section is already current, are left untouched.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
///
/// let updated = palimpsest::relink_collection(Path::new("vault"))?;
/// println!("Linked {} documents", updated);
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn relink_collection(root: &Path) -> Result<usize> {
    let documents = load(root)?;
    let tags: Vec<&TagSet> = documents.iter().map(|d| &d.tags).collect();

    let mut updates = Vec::new();
    for (i, document) in documents.iter().enumerate() {
        let ranked = rank_related(&tags, i);
        if ranked.is_empty() {
            continue;
        }

        let references: Vec<&str> =
            ranked.iter().map(|&(j, _)| documents[j].reference.as_str()).collect();
        let links = render_links(&references);
        let updated = splice_related(&document.text, document.body_start, &links);
        if updated != document.text {
            tracing::debug!(
                path = %document.path.display(),
                links = references.len(),
                "Related section changed"
            );
            updates.push((&document.path, updated));
        }
    }

    for (path, content) in &updates {
        write_atomic(path, content)?;
    }

    tracing::info!(documents = documents.len(), updated = updates.len(), "Relinked collection");
    Ok(updates.len())
}
