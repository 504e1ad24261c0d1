//! Front-matter grammar.
//!
//! ```text
//! header  := "---" NL (field NL)* "---" NL
//! field   := key ": " value
//! value   := plain | quoted | list
//! plain   := [A-Za-z0-9_./] [A-Za-z0-9_./@()+ -]*   (no leading/trailing space)
//! quoted  := '"' (char | escape)* '"'
//! escape  := \" | \\ | \n | \r | \t | \uXXXX
//! list    := "[" (value ("," value)*)? "]"
//! ```
//!
//! Anything that does not fit `plain` is written quoted, so decoding always yields
//! the original string. Decoding additionally accepts YAML single-quoted scalars and
//! block-style lists (`tags:` followed by `  - item` lines) as written by other tools.
//! Keys this crate does not own are carried through verbatim.

use chrono::NaiveDate;

use super::DocumentError;
use crate::models::{Source, TagSet};

pub const FENCE: &str = "---";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Metadata block at the top of every document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentHeader {
    pub source: Source,
    pub date: NaiveDate,
    pub model: Option<String>,
    /// Empty means the `tags` line is omitted
    pub tags: TagSet,
    pub id: String,
    /// Raw lines of keys owned by other tools, in their original order
    pub extra: Vec<String>,
}

impl DocumentHeader {
    /// Serialize including both fences and the trailing newline
    pub fn encode(&self) -> Result<String, DocumentError> {
        if self.id.trim().is_empty() {
            return Err(DocumentError::MissingField("id"));
        }

        let mut out = String::with_capacity(128);
        out.push_str(FENCE);
        out.push('\n');
        push_field(&mut out, "source", self.source.as_str());
        push_field(&mut out, "date", &self.date.format(DATE_FORMAT).to_string());
        if let Some(model) = &self.model {
            push_field(&mut out, "model", model);
        }
        if !self.tags.is_empty() {
            let items: Vec<String> = self.tags.iter().map(|t| encode_scalar(t)).collect();
            out.push_str("tags: [");
            out.push_str(&items.join(", "));
            out.push_str("]\n");
        }
        push_field(&mut out, "id", &self.id);
        for line in &self.extra {
            out.push_str(line);
            out.push('\n');
        }
        out.push_str(FENCE);
        out.push('\n');
        Ok(out)
    }

    /// Parse the lines between the fences
    pub fn decode(block: &str) -> Result<Self, DocumentError> {
        let mut source = None;
        let mut date = None;
        let mut model = None;
        let mut tags = TagSet::new();
        let mut id = None;
        let mut extra = Vec::new();
        let mut in_block_tags = false;

        for line in block.lines() {
            if line.trim().is_empty() {
                continue;
            }

            let indented = line.starts_with(' ') || line.starts_with('\t');
            let continuation = indented || line.starts_with("- ");
            if continuation {
                if in_block_tags {
                    let item = line.trim_start().strip_prefix('-').ok_or_else(|| {
                        DocumentError::InvalidValue {
                            key: "tags",
                            reason: "expected '- item'".into(),
                        }
                    })?;
                    insert_tag(&mut tags, decode_scalar(item, "tags")?);
                } else {
                    extra.push(line.to_string());
                }
                continue;
            }
            in_block_tags = false;

            let Some((key, value)) = line.split_once(':') else {
                extra.push(line.to_string());
                continue;
            };

            match key.trim() {
                "source" => source = Some(decode_scalar(value, "source")?.parse::<Source>()?),
                "date" => date = Some(decode_date(&decode_scalar(value, "date")?)?),
                "model" => model = Some(decode_scalar(value, "model")?).filter(|m| !m.is_empty()),
                "id" => id = Some(decode_scalar(value, "id")?),
                "tags" => {
                    if value.trim().is_empty() {
                        in_block_tags = true;
                    } else {
                        for tag in decode_list(value)? {
                            insert_tag(&mut tags, tag);
                        }
                    }
                }
                _ => extra.push(line.to_string()),
            }
        }

        Ok(Self {
            source: source.ok_or(DocumentError::MissingField("source"))?,
            date: date.ok_or(DocumentError::MissingField("date"))?,
            model,
            tags,
            id: id.filter(|id| !id.is_empty()).ok_or(DocumentError::MissingField("id"))?,
            extra,
        })
    }
}

fn push_field(out: &mut String, key: &str, value: &str) {
    out.push_str(key);
    out.push_str(": ");
    out.push_str(&encode_scalar(value));
    out.push('\n');
}

fn insert_tag(tags: &mut TagSet, tag: String) {
    if !tag.is_empty() {
        tags.insert(tag);
    }
}

fn is_plain(value: &str) -> bool {
    let mut chars = value.chars();
    let Some(first) = chars.next() else { return false };
    if !(first.is_ascii_alphanumeric() || matches!(first, '_' | '.' | '/')) {
        return false;
    }
    value.trim_end() == value
        && chars.all(|c| {
            c.is_ascii_alphanumeric()
                || matches!(c, '-' | '_' | '.' | '/' | '@' | '(' | ')' | '+' | ' ')
        })
}

/// Write a scalar plain when that is unambiguous, double-quoted otherwise
pub fn encode_scalar(value: &str) -> String {
    if is_plain(value) {
        return value.to_string();
    }

    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Read one scalar value (the text after `key:`)
pub fn decode_scalar(raw: &str, key: &'static str) -> Result<String, DocumentError> {
    let raw = raw.trim();
    let invalid = |reason: String| DocumentError::InvalidValue { key, reason };

    if raw.starts_with('"') || raw.starts_with('\'') {
        let (value, rest) = read_quoted(raw).map_err(invalid)?;
        if !rest.trim().is_empty() {
            return Err(invalid(format!("unexpected text after quoted value: {}", rest.trim())));
        }
        return Ok(value);
    }
    Ok(raw.to_string())
}

fn decode_list(raw: &str) -> Result<Vec<String>, DocumentError> {
    let invalid = |reason: String| DocumentError::InvalidValue { key: "tags", reason };
    let raw = raw.trim();
    let inner = raw
        .strip_prefix('[')
        .and_then(|r| r.strip_suffix(']'))
        .ok_or_else(|| invalid(format!("expected [a, b, ...], found {}", raw)))?;

    let mut items = Vec::new();
    let mut rest = inner.trim_start();
    while !rest.is_empty() {
        let (item, after) = if rest.starts_with('"') || rest.starts_with('\'') {
            read_quoted(rest).map_err(invalid)?
        } else {
            let end = rest.find(',').unwrap_or(rest.len());
            (rest[..end].trim().to_string(), &rest[end..])
        };
        items.push(item);

        let after = after.trim_start();
        rest = match after.strip_prefix(',') {
            Some(next) => next.trim_start(),
            None if after.is_empty() => after,
            None => return Err(invalid(format!("expected ',' before {}", after))),
        };
    }
    Ok(items)
}

/// Read a quoted scalar at the start of `input`, returning it and the remaining text
fn read_quoted(input: &str) -> Result<(String, &str), String> {
    let mut chars = input.char_indices();
    let Some((_, quote)) = chars.next() else { return Err("empty value".into()) };
    let mut value = String::new();

    while let Some((i, c)) = chars.next() {
        if c == quote {
            // YAML single-quoted strings escape a quote by doubling it
            if quote == '\'' && input[i + 1..].starts_with('\'') {
                chars.next();
                value.push('\'');
                continue;
            }
            return Ok((value, &input[i + 1..]));
        }
        if c != '\\' || quote == '\'' {
            value.push(c);
            continue;
        }

        let Some((_, escaped)) = chars.next() else { break };
        match escaped {
            '"' => value.push('"'),
            '\\' => value.push('\\'),
            '/' => value.push('/'),
            'n' => value.push('\n'),
            'r' => value.push('\r'),
            't' => value.push('\t'),
            '0' => value.push('\0'),
            'u' | 'x' => {
                let width = if escaped == 'u' { 4 } else { 2 };
                let hex: String = chars.by_ref().take(width).map(|(_, h)| h).collect();
                let decoded = u32::from_str_radix(&hex, 16)
                    .ok()
                    .filter(|_| hex.len() == width)
                    .and_then(char::from_u32)
                    .ok_or_else(|| format!("invalid escape \\{}{}", escaped, hex))?;
                value.push(decoded);
            }
            other => return Err(format!("unknown escape \\{}", other)),
        }
    }
    Err("unterminated quoted value".into())
}

fn decode_date(raw: &str) -> Result<NaiveDate, DocumentError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(raw.get(..10).unwrap_or(raw), DATE_FORMAT))
        .map_err(|_| DocumentError::InvalidDate(raw.to_string()))
}
