//! Codex CLI session log parser (`~/.codex/sessions/**/rollout-*.jsonl`).
//!
//! Records are `{timestamp, type, payload}`. `session_meta` describes the session,
//! `turn_context` carries the active model, and `response_item` records of payload
//! type `message` carry the conversation. Everything else (events, reasoning,
//! function calls) is ignored.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::models::{Conversation, Role, Source};
use crate::parsers::deserializers::{deserialize_optional_timestamp, timestamp_from_value};
use crate::parsers::session_log::{SessionDraft, read_records};

/// Injected context blocks that are not part of the conversation
const CONTEXT_MARKERS: [&str; 2] = ["<environment_context>", "<user_instructions>"];
const TEXT_BLOCK_TYPES: [&str; 3] = ["input_text", "output_text", "text"];

#[derive(Debug, Deserialize)]
struct SessionMeta {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    timestamp: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    cwd: Option<String>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    model_provider: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TurnContext {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    cwd: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ResponseItem {
    Message {
        role: String,
        #[serde(default)]
        content: CodexContent,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CodexContent {
    Text(String),
    Blocks(Vec<CodexBlock>),
}

impl Default for CodexContent {
    fn default() -> Self {
        CodexContent::Blocks(Vec::new())
    }
}

#[derive(Debug, Deserialize)]
struct CodexBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl CodexContent {
    /// Text blocks joined by newlines, minus injected context blocks
    fn render(&self) -> String {
        let parts: Vec<&str> = match self {
            CodexContent::Text(text) => vec![text.as_str()],
            CodexContent::Blocks(blocks) => blocks
                .iter()
                .filter(|block| TEXT_BLOCK_TYPES.contains(&block.kind.as_str()))
                .filter_map(|block| block.text.as_deref())
                .collect(),
        };
        parts
            .into_iter()
            .filter(|text| !is_injected_context(text))
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string()
    }
}

fn is_injected_context(text: &str) -> bool {
    let text = text.trim_start();
    CONTEXT_MARKERS.iter().any(|marker| text.starts_with(marker))
}

/// Parse one Codex session log. `origin` is the log's file stem.
///
/// Returns `None` when the log holds no eligible messages.
pub fn parse(raw: &[u8], origin: &str) -> Option<Conversation> {
    let mut draft = SessionDraft::new(Source::Codex);
    let mut provider: Option<String> = None;

    for (line, mut value) in read_records(raw, origin) {
        let timestamp = value.get("timestamp").and_then(timestamp_from_value);
        let kind = value.get("type").and_then(Value::as_str).unwrap_or_default().to_string();
        let payload = value.get_mut("payload").map(Value::take).unwrap_or(Value::Null);

        match kind.as_str() {
            "session_meta" => {
                let Some(meta) = decode_payload::<SessionMeta>(payload, origin, line) else {
                    continue;
                };
                draft.note_id(meta.id.as_deref());
                draft.note_cwd(meta.cwd.as_deref());
                draft.note_started(meta.timestamp.or(timestamp));
                draft.note_model(meta.model.as_deref());
                if provider.is_none() {
                    provider = meta.model_provider;
                }
            }
            "turn_context" => {
                let Some(context) = decode_payload::<TurnContext>(payload, origin, line) else {
                    continue;
                };
                draft.note_model(context.model.as_deref());
                draft.note_cwd(context.cwd.as_deref());
            }
            "response_item" => {
                let Some(ResponseItem::Message { role, content }) =
                    decode_payload::<ResponseItem>(payload, origin, line)
                else {
                    continue;
                };
                let role = match role.as_str() {
                    "user" => Role::User,
                    "assistant" => Role::Assistant,
                    _ => continue,
                };
                draft.push(role, content.render(), timestamp);
            }
            _ => {}
        }
    }

    if !draft.has_model() {
        draft.note_model(provider.as_deref());
    }

    draft.finish(origin)
}

fn decode_payload<T: DeserializeOwned>(payload: Value, origin: &str, line: usize) -> Option<T> {
    match serde_json::from_value(payload) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            tracing::warn!(origin, line, error = %e, "Skipping malformed Codex record");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SESSION: &str = r#"{"timestamp":"2025-08-01T12:00:00Z","type":"session_meta","payload":{"id":"codex-001","timestamp":"2025-08-01T12:00:00Z","cwd":"/home/dev/webapp","model_provider":"openai","git":{"branch":"main"}}}
{"timestamp":"2025-08-01T12:00:01Z","type":"response_item","payload":{"type":"message","role":"user","content":[{"type":"input_text","text":"<environment_context>\n  <cwd>/home/dev/webapp</cwd>\n  <os>Darwin 23.0.0</os>\n</environment_context>"}]}}
{"timestamp":"2025-08-01T12:00:02Z","type":"turn_context","payload":{"cwd":"/home/dev/webapp","model":"o3","approval_policy":"on-request"}}
{"timestamp":"2025-08-01T12:00:03Z","type":"response_item","payload":{"type":"message","role":"user","content":[{"type":"input_text","text":"How do I create a React component?"}]}}
{"timestamp":"2025-08-01T12:00:04Z","type":"event_msg","payload":{"type":"agent_reasoning","text":"thinking hard"}}
{"timestamp":"2025-08-01T12:00:05Z","type":"response_item","payload":{"type":"reasoning","summary":[]}}
{"timestamp":"2025-08-01T12:00:06Z","type":"response_item","payload":{"type":"function_call","name":"shell","arguments":"{}"}}
{"timestamp":"2025-08-01T12:00:07Z","type":"response_item","payload":{"type":"message","role":"assistant","content":[{"type":"output_text","text":"Here's how to create a React component"}]}}
{"timestamp":"2025-08-01T12:00:08Z","type":"response_item","payload":{"type":"message","role":"developer","content":[{"type":"input_text","text":"developer notes"}]}}"#;

    #[test]
    fn test_parses_session() {
        let conversation = parse(SESSION.as_bytes(), "rollout-2025-08-01").unwrap();
        assert_eq!(conversation.id, "codex-001");
        assert_eq!(conversation.source, Source::Codex);
        assert_eq!(conversation.model.as_deref(), Some("o3"));
        assert_eq!(conversation.title, "[webapp] How do I create a React component?");
        assert_eq!(conversation.messages.len(), 2);
        assert_eq!(conversation.messages[0].role, Role::User);
        assert_eq!(conversation.messages[1].content, "Here's how to create a React component");
    }

    #[test]
    fn test_environment_context_is_excluded() {
        let conversation = parse(SESSION.as_bytes(), "rollout").unwrap();
        for message in &conversation.messages {
            assert!(!message.content.contains("<environment_context>"));
            assert!(!message.content.contains("Darwin 23.0.0"));
            assert!(!message.content.contains("developer notes"));
            assert!(!message.content.contains("thinking hard"));
        }
    }

    #[test]
    fn test_model_falls_back_to_provider() {
        let raw = r#"{"timestamp":"2025-08-01T12:00:00Z","type":"session_meta","payload":{"id":"s","model_provider":"o3"}}
{"timestamp":"2025-08-01T12:00:03Z","type":"response_item","payload":{"type":"message","role":"user","content":[{"type":"input_text","text":"hi"}]}}"#;
        let conversation = parse(raw.as_bytes(), "rollout").unwrap();
        assert_eq!(conversation.model.as_deref(), Some("o3"));
    }

    #[test]
    fn test_without_session_meta_uses_origin_and_message_time() {
        let raw = r#"{"timestamp":"2025-08-02T08:00:00Z","type":"response_item","payload":{"type":"message","role":"user","content":"plain string content"}}"#;
        let conversation = parse(raw.as_bytes(), "rollout-abc").unwrap();
        assert_eq!(conversation.id, "rollout-abc");
        assert_eq!(conversation.date.to_rfc3339(), "2025-08-02T08:00:00+00:00");
        assert_eq!(conversation.messages[0].content, "plain string content");
    }

    #[test]
    fn test_only_context_yields_nothing() {
        let raw = r#"{"timestamp":"2025-08-01T12:00:01Z","type":"response_item","payload":{"type":"message","role":"user","content":[{"type":"input_text","text":"<user_instructions>be terse</user_instructions>"}]}}"#;
        assert!(parse(raw.as_bytes(), "rollout").is_none());
    }
}
