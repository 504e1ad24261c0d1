//! Persisted markdown document format.
//!
//! A document is a front-matter header ([`DocumentHeader`]) followed by a markdown
//! body. Encoding and decoding preserve `id`, `source`, `date` (day precision),
//! `model` and `tags` exactly, and decoding keeps header keys owned by other tools.

pub mod header;
pub mod naming;
pub mod render;

pub use header::DocumentHeader;
pub use naming::{document_filename, id_hash, slugify};
pub use render::{RELATED_HEADING, before_related, heading_title, related_marker, render_body};

use crate::models::{Conversation, UnknownSource};

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("document has no front matter")]
    MissingFrontMatter,
    #[error("front matter is not closed by '---'")]
    UnterminatedFrontMatter,
    #[error("front matter is missing '{0}'")]
    MissingField(&'static str),
    #[error(transparent)]
    UnknownSource(#[from] UnknownSource),
    #[error("invalid date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),
    #[error("invalid value for '{key}': {reason}")]
    InvalidValue { key: &'static str, reason: String },
    #[error("conversation has no messages")]
    EmptyConversation,
}

/// A decoded document: header plus the untouched body text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub header: DocumentHeader,
    pub body: String,
}

impl Document {
    pub fn to_markdown(&self) -> Result<String, DocumentError> {
        let mut out = self.header.encode()?;
        out.push_str(&self.body);
        Ok(out)
    }

    pub fn title(&self) -> Option<&str> {
        heading_title(&self.body)
    }
}

/// Encode a conversation into a full document (header and body)
pub fn encode_conversation(conversation: &Conversation) -> Result<String, DocumentError> {
    if conversation.messages.is_empty() {
        return Err(DocumentError::EmptyConversation);
    }

    let document = Document {
        header: DocumentHeader {
            source: conversation.source,
            date: conversation.date.date_naive(),
            model: conversation.model.clone().filter(|m| !m.trim().is_empty()),
            tags: conversation.tags.clone().unwrap_or_default(),
            id: conversation.id.clone(),
            extra: Vec::new(),
        },
        body: render_body(conversation),
    };
    document.to_markdown()
}

/// Split a document into header and body and decode the header
pub fn decode_document(text: &str) -> Result<Document, DocumentError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let rest = text
        .strip_prefix("---\n")
        .or_else(|| text.strip_prefix("---\r\n"))
        .ok_or(DocumentError::MissingFrontMatter)?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == header::FENCE {
            let header = DocumentHeader::decode(&rest[..offset])?;
            let body = rest[offset + line.len()..].to_string();
            return Ok(Document { header, body });
        }
        offset += line.len();
    }
    Err(DocumentError::UnterminatedFrontMatter)
}
