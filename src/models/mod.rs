//! Canonical data model shared by every parser and pipeline stage.
//!
//! - [`Conversation`] - One conversation, source-agnostic
//! - [`Message`] - One turn inside a conversation
//! - [`Source`] - Which product an export came from
//! - [`TagSet`] - Sorted, duplicate-free tag collection
//!
//! Parsers produce these values; the document codec, collection writer,
//! tagger and backlinker consume them.

pub mod conversation;

pub use conversation::{Conversation, Message, Role, Source, TagSet, UnknownSource};
