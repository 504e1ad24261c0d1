//! Shared machinery for line-delimited session logs.
//!
//! Every line is an independent JSON record. Lines that are blank, not UTF-8 or
//! not JSON are skipped with a warning; a log never fails as a whole.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::models::{Conversation, Message, Role, Source};
use crate::utils::project_name;

/// Maximum title length in characters before ellipsizing
pub const TITLE_MAX_CHARS: usize = 60;

/// Split raw log bytes into JSON records, keeping 1-based line numbers
pub fn read_records(raw: &[u8], origin: &str) -> Vec<(usize, Value)> {
    let mut records = Vec::new();
    let mut skipped_count = 0;

    for (line_num, line) in raw.split(|b| *b == b'\n').enumerate() {
        let Ok(line) = std::str::from_utf8(line) else {
            tracing::warn!(origin, line = line_num + 1, "Skipping non UTF-8 line");
            skipped_count += 1;
            continue;
        };

        // Skip empty lines
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<Value>(line) {
            Ok(value) => records.push((line_num + 1, value)),
            Err(e) => {
                tracing::warn!(
                    origin,
                    line = line_num + 1,
                    error = %e,
                    "Skipping unparseable JSON line"
                );
                skipped_count += 1;
            }
        }
    }

    if skipped_count > 0 {
        tracing::debug!(
            origin,
            records = records.len(),
            skipped = skipped_count,
            "Read session log"
        );
    }

    records
}

/// Conversation under construction while a session log is being read
#[derive(Debug)]
pub struct SessionDraft {
    source: Source,
    id: Option<String>,
    cwd: Option<String>,
    started: Option<DateTime<Utc>>,
    model: Option<String>,
    messages: Vec<Message>,
}

impl SessionDraft {
    pub fn new(source: Source) -> Self {
        Self { source, id: None, cwd: None, started: None, model: None, messages: Vec::new() }
    }

    /// Record the session id; the first non-empty value wins
    pub fn note_id(&mut self, id: Option<&str>) {
        fill(&mut self.id, id);
    }

    pub fn note_cwd(&mut self, cwd: Option<&str>) {
        fill(&mut self.cwd, cwd);
    }

    pub fn note_model(&mut self, model: Option<&str>) {
        fill(&mut self.model, model);
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    pub fn note_started(&mut self, started: Option<DateTime<Utc>>) {
        if self.started.is_none() {
            self.started = started;
        }
    }

    /// Append a message, dropping it when it carries no text
    pub fn push(&mut self, role: Role, text: String, timestamp: Option<DateTime<Utc>>) {
        if text.trim().is_empty() {
            return;
        }
        self.messages.push(Message::new(role, text, timestamp));
    }

    /// Finish the draft. `origin` (the log's file stem) stands in for a missing session id.
    ///
    /// Returns `None` when the log held no eligible messages or no timestamp at all.
    pub fn finish(self, origin: &str) -> Option<Conversation> {
        if self.messages.is_empty() {
            tracing::debug!(origin, "Session log has no eligible messages");
            return None;
        }

        let Some(date) = self.started.or_else(|| self.messages.iter().find_map(|m| m.timestamp))
        else {
            tracing::warn!(origin, "Skipping session log without any timestamp");
            return None;
        };

        let title = session_title(self.source, &self.messages, self.cwd.as_deref());
        Some(Conversation {
            id: self.id.unwrap_or_else(|| origin.to_string()),
            title,
            source: self.source,
            model: self.model,
            date,
            messages: self.messages,
            tags: None,
        })
    }
}

fn fill(slot: &mut Option<String>, value: Option<&str>) {
    if slot.is_none() {
        *slot = value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string);
    }
}

/// Title from the first message, prefixed with `[project] ` when the working
/// directory is known
///
/// Codex rollouts open with injected instructions, so their title comes from the
/// first user message instead.
pub fn session_title(source: Source, messages: &[Message], cwd: Option<&str>) -> String {
    let first = match source {
        Source::Codex => messages.iter().find(|m| m.role == Role::User),
        _ => None,
    }
    .or_else(|| messages.first());
    let text = first.map(|m| m.content.as_str()).unwrap_or_default();
    let title = truncate_title(text);
    match cwd.and_then(project_name) {
        Some(project) => format!("[{}] {}", project, title),
        None => title,
    }
}

/// Collapse newlines to spaces and cut at [`TITLE_MAX_CHARS`] characters
pub fn truncate_title(text: &str) -> String {
    let flattened: String =
        text.trim().chars().map(|c| if c == '\n' || c == '\r' { ' ' } else { c }).collect();
    if flattened.chars().count() > TITLE_MAX_CHARS {
        let mut cut: String = flattened.chars().take(TITLE_MAX_CHARS).collect();
        cut.push_str("...");
        cut
    } else {
        flattened
    }
}
