use crate::document::{RELATED_HEADING, related_marker};

/// Link target for a title: wiki-link syntax characters removed
pub fn link_reference(title: &str) -> String {
    let cleaned: String = title.chars().filter(|c| !matches!(c, '[' | ']' | '|' | '#')).collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn render_links<S: AsRef<str>>(references: &[S]) -> String {
    references
        .iter()
        .map(|r| format!("- [[{}]]", r.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Replace the Related section of `text` with `links`
///
/// Only the part of `text` from `body_start` on is searched for the marker, so
/// header lines are never mistaken for it. Everything up to and including the
/// marker is kept; without a marker a new section is appended.
pub fn splice_related(text: &str, body_start: usize, links: &str) -> String {
    let body = text.get(body_start..).unwrap_or("");
    match related_marker(body) {
        Some(at) => {
            let keep = body_start + at + RELATED_HEADING.len();
            format!("{}\n\n{}\n", &text[..keep], links)
        }
        None => format!("{}\n\n{}\n\n{}\n", text.trim_end(), RELATED_HEADING, links),
    }
}
