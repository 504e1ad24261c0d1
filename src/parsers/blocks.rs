//! Typed content blocks shared by the Claude web export and Claude Code logs.

use serde::Deserialize;

/// Marker that opens a rendered thinking aside
pub const THINKING_MARKER: &str = "*thinking:*";

/// One typed block of message content
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        #[serde(default)]
        text: String,
    },
    Thinking {
        #[serde(default)]
        thinking: String,
    },
    ToolUse {},
    ToolResult {},
    #[serde(other)]
    Other,
}

/// Message content is either a bare string or an ordered list of blocks
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

impl MessageContent {
    pub fn render(&self) -> String {
        match self {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Blocks(blocks) => render_blocks(blocks),
        }
    }
}

/// Render blocks in order: text verbatim, thinking as a quoted aside, tool
/// invocations and results dropped. Parts are separated by blank lines.
pub fn render_blocks(blocks: &[ContentBlock]) -> String {
    let parts: Vec<String> = blocks
        .iter()
        .filter_map(|block| match block {
            ContentBlock::Text { text } if !text.trim().is_empty() => Some(text.clone()),
            ContentBlock::Thinking { thinking } if !thinking.trim().is_empty() => {
                Some(thinking_aside(thinking))
            }
            _ => None,
        })
        .collect();
    parts.join("\n\n")
}

/// Format reasoning text as a Markdown blockquote opened by [`THINKING_MARKER`]
pub fn thinking_aside(thinking: &str) -> String {
    let mut out = String::with_capacity(thinking.len() + 32);
    for (i, line) in thinking.trim().lines().enumerate() {
        if i == 0 {
            out.push_str("> ");
            out.push_str(THINKING_MARKER);
            out.push(' ');
            out.push_str(line);
        } else {
            out.push('\n');
            if line.is_empty() {
                out.push('>');
            } else {
                out.push_str("> ");
                out.push_str(line);
            }
        }
    }
    out
}
