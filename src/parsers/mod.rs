//! Source parsers: raw export bytes in, canonical [`Conversation`]s out
//!
//! # Error Handling Strategy
//!
//! This module follows a **graceful degradation** approach:
//!
//! - **Malformed units**: A conversation (JSON exports) or a line/record (session logs)
//!   that fails to parse is logged with `tracing::warn!` and skipped. The batch continues.
//!
//! - **Malformed source files**: When the top-level shape is wrong (not an array, not a
//!   wrapped object, a zip without `conversations.json`) the whole call fails. There is
//!   nothing meaningful to salvage.
//!
//! - **Empty results**: Conversations that resolve to zero eligible messages are not
//!   emitted. That is not an error.
//!
//! Parsers are pure: they never touch the filesystem or the clock.

pub mod blocks;
pub mod chatgpt;
pub mod claude_code;
pub mod claude_web;
pub mod codex;
pub mod deserializers;
pub mod session_log;

use anyhow::Result;

use crate::models::{Conversation, Source};

/// Parse raw export bytes for the given source
///
/// `origin` names the input (usually the file stem). Session-log dialects use it
/// as the conversation id when the log carries no session id.
///
/// # Examples
///
/// ```
/// use palimpsest::models::Source;
/// use palimpsest::parse_source;
///
/// let log = br#"{"type":"user","sessionId":"s1","timestamp":"2025-01-01T00:00:00Z","message":{"role":"user","content":"hi"}}"#;
/// let conversations = parse_source(Source::ClaudeCode, log, "s1")?;
/// assert_eq!(conversations.len(), 1);
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn parse_source(source: Source, raw: &[u8], origin: &str) -> Result<Vec<Conversation>> {
    match source {
        Source::ChatGpt => chatgpt::parse(raw),
        Source::ClaudeWeb => claude_web::parse(raw),
        Source::ClaudeCode => Ok(claude_code::parse(raw, origin).into_iter().collect()),
        Source::Codex => Ok(codex::parse(raw, origin).into_iter().collect()),
    }
}
