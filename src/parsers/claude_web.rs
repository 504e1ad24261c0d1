//! Claude web export parser.
//!
//! The claude.ai export is a flat, chronological list of messages per conversation.
//! Messages carry a plain `text` field and, in newer exports, a richer `content`
//! block list that is preferred when present.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::models::{Conversation, Message, Role, Source};
use crate::parsers::blocks::{ContentBlock, render_blocks};
use crate::parsers::deserializers::{deserialize_non_empty_string, deserialize_optional_timestamp};

/// Top-level shape of the export, checked once before any conversation is read
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClaudeWebExport {
    Bare(Vec<Value>),
    Wrapped { conversations: Vec<Value> },
}

impl ClaudeWebExport {
    fn into_items(self) -> Vec<Value> {
        match self {
            ClaudeWebExport::Bare(items) => items,
            ClaudeWebExport::Wrapped { conversations } => conversations,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ClaudeWebConversation {
    uuid: String,
    #[serde(default, deserialize_with = "deserialize_non_empty_string")]
    name: Option<String>,
    created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "deserialize_non_empty_string")]
    model: Option<String>,
    #[serde(default)]
    chat_messages: Vec<ClaudeWebMessage>,
}

#[derive(Debug, Deserialize)]
struct ClaudeWebMessage {
    #[serde(default)]
    sender: String,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    content: Vec<ContentBlock>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    created_at: Option<DateTime<Utc>>,
}

/// Parse a claude.ai export: a bare array of conversations, or an object with
/// a `conversations` array
///
/// # Errors
///
/// Returns an error if the top-level JSON has neither shape.
pub fn parse(raw: &[u8]) -> Result<Vec<Conversation>> {
    let export: ClaudeWebExport = serde_json::from_slice(raw).context(
        "Claude web export must be an array of conversations or an object with a \"conversations\" array",
    )?;

    let mut conversations = Vec::new();
    for (index, item) in export.into_items().into_iter().enumerate() {
        match serde_json::from_value::<ClaudeWebConversation>(item) {
            Ok(raw) => {
                if let Some(conversation) = convert(raw) {
                    conversations.push(conversation);
                } else {
                    tracing::debug!(index, "Claude web conversation has no messages, skipping");
                }
            }
            Err(e) => {
                tracing::warn!(index, error = %e, "Skipping malformed Claude web conversation");
            }
        }
    }

    Ok(conversations)
}

fn convert(raw: ClaudeWebConversation) -> Option<Conversation> {
    let messages: Vec<Message> = raw.chat_messages.iter().filter_map(to_message).collect();
    if messages.is_empty() {
        return None;
    }

    Some(Conversation {
        id: raw.uuid,
        title: raw.name.unwrap_or_else(|| "Untitled".to_string()),
        source: Source::ClaudeWeb,
        model: raw.model,
        date: raw.created_at,
        messages,
        tags: None,
    })
}

fn to_message(message: &ClaudeWebMessage) -> Option<Message> {
    let role = match message.sender.as_str() {
        "human" => Role::User,
        "assistant" => Role::Assistant,
        _ => return None,
    };

    let text = if message.content.is_empty() {
        message.text.clone().unwrap_or_default()
    } else {
        render_blocks(&message.content)
    };
    if text.trim().is_empty() {
        return None;
    }

    Some(Message::new(role, text, message.created_at))
}
