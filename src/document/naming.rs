use sha2::{Digest, Sha256};

use super::render::title_line;
use crate::models::Conversation;

const SLUG_MAX_CHARS: usize = 50;
const HASH_CHARS: usize = 8;

/// Lowercase ASCII slug, `untitled` when nothing survives
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            slug.push(c);
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }

    let trimmed: String = slug.trim_matches('-').chars().take(SLUG_MAX_CHARS).collect();
    let trimmed = trimmed.trim_end_matches('-');
    if trimmed.is_empty() { "untitled".to_string() } else { trimmed.to_string() }
}

/// First eight hex characters of SHA-256 over the id
pub fn id_hash(id: &str) -> String {
    let digest = Sha256::digest(id.as_bytes());
    let mut hash = hex::encode(digest);
    hash.truncate(HASH_CHARS);
    hash
}

/// `<YYYY-MM-DD>_<source>_<hash>_<slug>.md`
pub fn document_filename(conversation: &Conversation) -> String {
    format!(
        "{}_{}_{}_{}.md",
        conversation.date.format("%Y-%m-%d"),
        conversation.source,
        id_hash(&conversation.id),
        slugify(&title_line(&conversation.title)),
    )
}
