//! Claude Code session log parser (`~/.claude/projects/<project>/<session>.jsonl`).
//!
//! Conversation records are typed `user` or `assistant` and each carries the
//! session id, working directory and timestamp. Bookkeeping records
//! (`file-history-snapshot`, `summary`, `system`) are ignored.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::models::{Conversation, Role, Source};
use crate::parsers::blocks::MessageContent;
use crate::parsers::deserializers::deserialize_optional_timestamp;
use crate::parsers::session_log::{SessionDraft, read_records};

/// Placeholder text Claude Code writes for empty assistant turns
const NO_CONTENT: &str = "(no content)";
/// Model name Claude Code records for locally synthesized messages
const SYNTHETIC_MODEL: &str = "<synthetic>";

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
enum ClaudeCodeRecord {
    User(ClaudeCodeEntry),
    Assistant(ClaudeCodeEntry),
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct ClaudeCodeEntry {
    #[serde(rename = "sessionId", default)]
    session_id: Option<String>,
    #[serde(default)]
    cwd: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    message: Option<EntryMessage>,
}

#[derive(Debug, Deserialize)]
struct EntryMessage {
    content: MessageContent,
    #[serde(default)]
    model: Option<String>,
}

/// Parse one Claude Code session log. `origin` is the log's file stem.
///
/// Returns `None` when the log holds no eligible messages.
pub fn parse(raw: &[u8], origin: &str) -> Option<Conversation> {
    let mut draft = SessionDraft::new(Source::ClaudeCode);

    for (line, value) in read_records(raw, origin) {
        let record = match serde_json::from_value::<ClaudeCodeRecord>(value) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(origin, line, error = %e, "Skipping malformed Claude Code record");
                continue;
            }
        };

        let (role, entry) = match record {
            ClaudeCodeRecord::User(entry) => (Role::User, entry),
            ClaudeCodeRecord::Assistant(entry) => (Role::Assistant, entry),
            ClaudeCodeRecord::Other => continue,
        };

        draft.note_id(entry.session_id.as_deref());
        draft.note_cwd(entry.cwd.as_deref());
        draft.note_started(entry.timestamp);

        let Some(message) = entry.message else { continue };
        if role == Role::Assistant {
            draft.note_model(message.model.as_deref().filter(|m| *m != SYNTHETIC_MODEL));
        }

        let text = message.content.render();
        if text.trim() == NO_CONTENT {
            continue;
        }
        draft.push(role, text, entry.timestamp);
    }

    draft.finish(origin)
}
