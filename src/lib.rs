//! Palimpsest - turn AI chat exports into a linked markdown collection
//!
//! This library reads conversation exports from ChatGPT and claude.ai and the
//! local session logs of Claude Code and Codex, and writes each conversation as
//! a markdown document with a small metadata header. It supports:
//!
//! - Parsing every source into one canonical [`Conversation`](models::Conversation) shape
//! - Writing documents into a collection, skipping conversations already present
//! - Deriving tags from source, date, model and content
//! - Linking documents that share tags through a `## Related` section
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use palimpsest::models::Source;
//! use palimpsest::{parse_source, relink_collection, write_to_collection};
//!
//! let raw = std::fs::read("conversations.json")?;
//! for conversation in parse_source(Source::ClaudeWeb, &raw, "conversations")? {
//!     write_to_collection(conversation, Path::new("vault"))?;
//! }
//! relink_collection(Path::new("vault"))?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod backlinks;
pub mod cli;
pub mod collection;
pub mod document;
pub mod ingest;
pub mod models;
pub mod parsers;
pub mod tagger;
pub mod utils;

// Re-export commonly used entry points
pub use backlinks::relink_collection;
pub use collection::{CollectionWriter, write_to_collection};
pub use document::{decode_document, encode_conversation};
pub use parsers::parse_source;
pub use tagger::generate_tags;
pub use tagger::retag::tag_collection;
