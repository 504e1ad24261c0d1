use std::fmt::Write;

use crate::models::Conversation;

pub const RELATED_HEADING: &str = "## Related";
pub const UNTITLED: &str = "Untitled";

/// Title as it appears on the `# ` line: newlines collapsed, never empty
pub fn title_line(title: &str) -> String {
    let collapsed = title.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() { UNTITLED.to_string() } else { collapsed }
}

/// Render the markdown body: title, one section per message, then an empty Related section
pub fn render_body(conversation: &Conversation) -> String {
    let mut out = String::new();
    let _ = write!(out, "# {}\n\n", title_line(&conversation.title));
    for message in &conversation.messages {
        let _ = write!(out, "## {}\n\n{}\n\n", message.role.label(), message.content);
    }
    out.push_str(RELATED_HEADING);
    out.push('\n');
    out
}

/// Byte offset of the start of the last line that reads exactly `## Related`
pub fn related_marker(text: &str) -> Option<usize> {
    let mut offset = 0;
    let mut found = None;
    for line in text.split_inclusive('\n') {
        if line.trim_end() == RELATED_HEADING {
            found = Some(offset);
        }
        offset += line.len();
    }
    found
}

/// Body text up to (not including) the Related section
pub fn before_related(body: &str) -> &str {
    match related_marker(body) {
        Some(at) => &body[..at],
        None => body,
    }
}

/// First `# ` heading of a body
pub fn heading_title(body: &str) -> Option<&str> {
    body.lines()
        .find_map(|line| line.strip_prefix("# "))
        .map(str::trim)
        .filter(|title| !title.is_empty())
}
