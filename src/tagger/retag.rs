use std::path::Path;

use anyhow::Result;

use super::generate_tags;
use crate::collection::{list_documents, read_document, write_atomic};
use crate::document::before_related;

/// Add derived tags to every document in the collection
///
/// Existing tags are kept; derived tags come from the header fields and the
/// body above the Related section. Only the header is rewritten, and only for
/// documents whose tag set grew. Returns the number of documents changed.
pub fn tag_collection(root: &Path) -> Result<usize> {
    let paths = list_documents(root)?;
    let mut updated = 0;

    for path in &paths {
        let Some((text, mut document)) = read_document(path)? else { continue };

        let header = &document.header;
        let derived = generate_tags(
            header.source,
            header.date,
            header.model.as_deref(),
            Some(before_related(&document.body)),
        );
        if derived.is_subset(&header.tags) {
            continue;
        }

        document.header.tags.extend(derived);
        let markdown = document.to_markdown()?;
        if markdown != text {
            write_atomic(path, &markdown)?;
            updated += 1;
        }
    }

    tracing::info!(documents = paths.len(), updated, "Tagged collection");
    Ok(updated)
}
