use crate::models::Entry;

/// Orders scored candidates best first
///
/// Descending by match value; equal values fall back to title order so the
/// same inputs always produce the same ranking.
pub fn rank(mut entries: Vec<Entry>) -> Vec<Entry> {
    entries.sort_by(|a, b| b.cmp(a));
    entries
}
