//! Deterministic orderings over a user's words and the page arithmetic
//! shared by the learn and review queues.

use std::cmp::Ordering;
use std::ops::Range;

use serde::Serialize;

use crate::model::{UserDocument, WordRecord};

/// One row of the review queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewEntry {
    pub word: String,
    pub mistakes: u32,
    pub correct_count: u32,
    pub last_seen: i64,
}

impl ReviewEntry {
    fn new(word: &str, record: &WordRecord) -> Self {
        Self {
            word: word.to_owned(),
            mistakes: record.mistakes(),
            correct_count: record.correct_count(),
            last_seen: record.last_seen(),
        }
    }
}

/// Every word in lexicographic order.
#[must_use]
pub fn learn_queue(doc: &UserDocument) -> Vec<&str> {
    doc.words().keys().map(String::as_str).collect()
}

/// Words with at least one mistake, most mistakes first; equal counts put the
/// least recently seen word first, then fall back to word order.
#[must_use]
pub fn review_queue(doc: &UserDocument) -> Vec<ReviewEntry> {
    let mut entries: Vec<ReviewEntry> = doc
        .words()
        .iter()
        .filter(|(_, record)| record.needs_review())
        .map(|(word, record)| ReviewEntry::new(word, record))
        .collect();
    // Stable sort over map order keeps full ties lexicographic.
    entries.sort_by(review_order);
    entries
}

fn review_order(a: &ReviewEntry, b: &ReviewEntry) -> Ordering {
    b.mistakes
        .cmp(&a.mistakes)
        .then_with(|| a.last_seen.cmp(&b.last_seen))
}

/// Number of pages needed for `total` items, rounding up.
#[must_use]
pub fn total_pages(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// The page that contains `position`.
#[must_use]
pub fn page_containing(position: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    (position / page_size).saturating_add(1)
}

/// Index range of a 1-based page, or `None` when the page starts at or past
/// the end of the queue.
#[must_use]
pub fn page_bounds(page: usize, page_size: usize, total: usize) -> Option<Range<usize>> {
    let start = page.checked_sub(1)?.checked_mul(page_size)?;
    if start >= total {
        return None;
    }
    let end = start.saturating_add(page_size).min(total);
    Some(start..end)
}

/// `position / total * 100`, or `0` for an empty queue.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn completion_percentage(position: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    position as f64 / total as f64 * 100.0
}
