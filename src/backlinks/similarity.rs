use crate::models::TagSet;

/// Fewest shared tags for two documents to count as related
pub const MIN_SHARED_TAGS: usize = 2;
/// Most links written into one Related section
pub const MAX_RELATED: usize = 5;

pub fn shared_tags(a: &TagSet, b: &TagSet) -> usize {
    a.intersection(b).count()
}

/// Peers of `target` as `(index, score)`, best first
///
/// Equal scores keep collection order. Only the first [`MAX_RELATED`] peers
/// scoring at least [`MIN_SHARED_TAGS`] are returned.
pub fn rank_related(tags: &[&TagSet], target: usize) -> Vec<(usize, usize)> {
    let Some(own) = tags.get(target) else { return Vec::new() };

    let mut ranked: Vec<(usize, usize)> = tags
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != target)
        .map(|(i, other)| (i, shared_tags(own, other)))
        .filter(|(_, score)| *score >= MIN_SHARED_TAGS)
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(MAX_RELATED);
    ranked
}
