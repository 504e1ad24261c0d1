//! Tag derivation.
//!
//! [`generate_tags`] is a pure function of a document's source, date, model and
//! body text. [`retag::tag_collection`] applies it to documents already on disk.

pub mod retag;
pub mod tables;

use chrono::{Datelike, NaiveDate};

use crate::models::{Source, TagSet};
use tables::{MODEL_FAMILIES, TOPICS};

/// Derive the tag set for a document
///
/// Always contains the source, the four-digit year and the quarter (`Q1`-`Q4`).
/// A model contributes at most one family tag; body text contributes topic tags.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use palimpsest::generate_tags;
/// use palimpsest::models::Source;
///
/// let date = NaiveDate::from_ymd_opt(2025, 4, 2).unwrap();
/// let tags = generate_tags(Source::ChatGpt, date, Some("gpt-4o-mini"), Some("a Rust question"));
/// let tags: Vec<&str> = tags.iter().map(String::as_str).collect();
/// assert_eq!(tags, ["2025", "Q2", "chatgpt", "gpt-4o", "rust"]);
/// ```
pub fn generate_tags(
    source: Source,
    date: NaiveDate,
    model: Option<&str>,
    body: Option<&str>,
) -> TagSet {
    let mut tags = TagSet::new();
    tags.insert(source.to_string());
    tags.insert(format!("{:04}", date.year()));
    tags.insert(quarter(date));

    if let Some(family) = model.and_then(model_family) {
        tags.insert(family.to_string());
    }
    if let Some(body) = body {
        tags.extend(topics(body).map(str::to_string));
    }
    tags
}

fn quarter(date: NaiveDate) -> String {
    format!("Q{}", (date.month() + 2) / 3)
}

/// First family in priority order whose pattern matches
pub fn model_family(model: &str) -> Option<&'static str> {
    let model = model.trim().to_lowercase();
    MODEL_FAMILIES
        .iter()
        .find(|(_, patterns)| patterns.iter().any(|p| p.matches(&model)))
        .map(|(family, _)| *family)
}

fn topics(body: &str) -> impl Iterator<Item = &'static str> {
    let lower = body.to_lowercase();
    TOPICS
        .iter()
        .filter(move |(_, keywords)| keywords.iter().any(|k| k.matches(&lower)))
        .map(|(topic, _)| *topic)
}
