use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tags are always kept sorted and deduplicated
pub type TagSet = BTreeSet<String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    /// Section heading used in rendered documents
    pub fn label(self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Assistant => "Assistant",
            Role::System => "System",
        }
    }
}

/// The chat product a conversation was exported from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Source {
    #[serde(rename = "chatgpt")]
    ChatGpt,
    #[serde(rename = "claude-web")]
    ClaudeWeb,
    #[serde(rename = "claude-code")]
    ClaudeCode,
    #[serde(rename = "codex")]
    Codex,
}

impl Source {
    pub const ALL: [Source; 4] =
        [Source::ChatGpt, Source::ClaudeWeb, Source::ClaudeCode, Source::Codex];

    pub fn as_str(self) -> &'static str {
        match self {
            Source::ChatGpt => "chatgpt",
            Source::ClaudeWeb => "claude-web",
            Source::ClaudeCode => "claude-code",
            Source::Codex => "codex",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown source '{0}' (expected one of: chatgpt, claude-web, claude-code, codex)")]
pub struct UnknownSource(pub String);

impl FromStr for Source {
    type Err = UnknownSource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Source::ALL
            .into_iter()
            .find(|source| source.as_str() == s)
            .ok_or_else(|| UnknownSource(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>, timestamp: Option<DateTime<Utc>>) -> Self {
        Self { role, content: content.into(), timestamp }
    }
}

/// A conversation in canonical form.
///
/// `id` is the deduplication key and must be stable across repeated exports of
/// the same conversation. A materialized conversation always has at least one
/// message; parsers drop conversations that end up empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub title: String,
    pub source: Source,
    #[serde(default)]
    pub model: Option<String>,
    pub date: DateTime<Utc>,
    pub messages: Vec<Message>,
    #[serde(default)]
    pub tags: Option<TagSet>,
}

impl Conversation {
    /// All message contents joined by blank lines, as fed to the tagger
    pub fn body_text(&self) -> String {
        self.messages.iter().map(|m| m.content.as_str()).collect::<Vec<_>>().join("\n\n")
    }
}
