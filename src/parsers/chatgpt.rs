//! ChatGPT export parser.
//!
//! A ChatGPT export (`conversations.json`, optionally inside the export zip) is an
//! array of conversations. Each conversation stores its messages as a node mapping
//! `id -> {message, parent, children}` where regenerated answers and edited prompts
//! leave forked branches behind. Only the single active branch is materialized.

use std::collections::{BTreeMap, HashSet};
use std::io::{Cursor, Read};

use anyhow::{Context, Result, anyhow, bail};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::models::{Conversation, Message, Role, Source};
use crate::parsers::deserializers::{deserialize_non_empty_string, deserialize_optional_timestamp};

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const ARCHIVE_MEMBER: &str = "conversations.json";
const CONTENT_TYPE_TEXT: &str = "text";
const CONTENT_TYPE_MULTIMODAL: &str = "multimodal_text";

#[derive(Debug, Deserialize)]
struct ChatGptConversation {
    #[serde(default, deserialize_with = "deserialize_non_empty_string")]
    id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_non_empty_string")]
    conversation_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_non_empty_string")]
    title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    create_time: Option<DateTime<Utc>>,
    #[serde(default)]
    mapping: BTreeMap<String, ChatGptNode>,
    #[serde(default)]
    current_node: Option<String>,
    #[serde(default, deserialize_with = "deserialize_non_empty_string")]
    default_model_slug: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatGptNode {
    #[serde(default)]
    message: Option<ChatGptMessage>,
    #[serde(default)]
    parent: Option<String>,
    #[serde(default)]
    children: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ChatGptMessage {
    author: ChatGptAuthor,
    #[serde(default)]
    content: Option<ChatGptContent>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    create_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct ChatGptAuthor {
    role: String,
}

#[derive(Debug, Deserialize)]
struct ChatGptContent {
    #[serde(default)]
    content_type: String,
    #[serde(default)]
    parts: Vec<Value>,
}

/// Parse a ChatGPT export (raw `conversations.json` or the export zip)
///
/// # Errors
///
/// Returns an error if the input is not a JSON array, or is a zip archive
/// without `conversations.json`. Individual conversations that fail to parse
/// are logged and skipped.
pub fn parse(raw: &[u8]) -> Result<Vec<Conversation>> {
    let json = if raw.starts_with(ZIP_MAGIC) { read_archive_member(raw)? } else { raw.to_vec() };

    let items: Vec<Value> = serde_json::from_slice(&json)
        .context("ChatGPT export must be a JSON array of conversations")?;

    let mut conversations = Vec::with_capacity(items.len());
    let mut skipped = 0;

    for (index, item) in items.into_iter().enumerate() {
        let parsed = serde_json::from_value::<ChatGptConversation>(item)
            .map_err(anyhow::Error::from)
            .and_then(convert);
        match parsed {
            Ok(Some(conversation)) => conversations.push(conversation),
            Ok(None) => {
                tracing::debug!(index, "ChatGPT conversation has no eligible messages, skipping");
            }
            Err(e) => {
                tracing::warn!(index, error = %e, "Skipping malformed ChatGPT conversation");
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        tracing::info!(parsed = conversations.len(), skipped, "Parsed ChatGPT export");
    }

    Ok(conversations)
}

fn read_archive_member(raw: &[u8]) -> Result<Vec<u8>> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(raw)).context("Failed to read ChatGPT export archive")?;
    let mut member = archive
        .by_name(ARCHIVE_MEMBER)
        .with_context(|| format!("No {} found in ChatGPT export archive", ARCHIVE_MEMBER))?;
    let mut json = Vec::new();
    member
        .read_to_end(&mut json)
        .with_context(|| format!("Failed to extract {} from archive", ARCHIVE_MEMBER))?;
    Ok(json)
}

fn convert(raw: ChatGptConversation) -> Result<Option<Conversation>> {
    let id = raw
        .id
        .or(raw.conversation_id)
        .ok_or_else(|| anyhow!("conversation has neither id nor conversation_id"))?;

    let messages: Vec<Message> = active_path(&raw.mapping, raw.current_node.as_deref())
        .into_iter()
        .filter_map(|node_id| raw.mapping.get(node_id)?.message.as_ref())
        .filter_map(to_message)
        .collect();

    if messages.is_empty() {
        return Ok(None);
    }

    let Some(date) = raw.create_time.or_else(|| messages.iter().find_map(|m| m.timestamp)) else {
        bail!("conversation {} has no create_time and no timestamped messages", id);
    };

    Ok(Some(Conversation {
        id,
        title: raw.title.unwrap_or_else(|| "Untitled".to_string()),
        source: Source::ChatGpt,
        model: raw.default_model_slug,
        date,
        messages,
        tags: None,
    }))
}

/// Node ids on the active branch, root first.
///
/// With a known `current_node` the branch is the parent chain from that leaf
/// back to the root. Without one, the walk starts at the parentless root and
/// follows the first child until a node has no children. Cycles and dangling
/// references end the walk.
fn active_path<'a>(
    mapping: &'a BTreeMap<String, ChatGptNode>,
    current_node: Option<&str>,
) -> Vec<&'a str> {
    let mut path = Vec::new();
    let mut visited = HashSet::new();

    if let Some((leaf, _)) = current_node.and_then(|id| mapping.get_key_value(id)) {
        let mut cursor = Some(leaf.as_str());
        while let Some(id) = cursor {
            let Some((key, node)) = mapping.get_key_value(id) else { break };
            if !visited.insert(key.as_str()) {
                break;
            }
            path.push(key.as_str());
            cursor = node.parent.as_deref();
        }
        path.reverse();
        return path;
    }

    let root = mapping
        .iter()
        .find(|(_, node)| node.parent.as_deref().is_none_or(|p| !mapping.contains_key(p)))
        .map(|(id, _)| id.as_str());

    let mut cursor = root;
    while let Some(id) = cursor {
        let Some((key, node)) = mapping.get_key_value(id) else { break };
        if !visited.insert(key.as_str()) {
            break;
        }
        path.push(key.as_str());
        cursor = node.children.first().map(String::as_str);
    }
    path
}

fn to_message(message: &ChatGptMessage) -> Option<Message> {
    let role = match message.author.role.as_str() {
        "user" => Role::User,
        "assistant" => Role::Assistant,
        _ => return None,
    };

    let content = message.content.as_ref()?;
    let eligible = match role {
        Role::Assistant => content.content_type == CONTENT_TYPE_TEXT,
        _ => {
            content.content_type == CONTENT_TYPE_TEXT
                || content.content_type == CONTENT_TYPE_MULTIMODAL
        }
    };
    if !eligible {
        return None;
    }

    let text = content.parts.iter().filter_map(Value::as_str).collect::<Vec<_>>().join("\n");
    if text.trim().is_empty() {
        return None;
    }

    Some(Message::new(role, text, message.create_time))
}
