use serde::{Deserialize, Serialize};

/// Per-word progress counters.
///
/// `mistakes` and `correct_count` only ever grow, except through
/// [`WordRecord::reset`]. `last_seen` is seconds since the Unix epoch, with
/// `0` meaning the word has never been answered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordRecord {
    mistakes: u32,
    #[serde(default)]
    correct_count: u32,
    #[serde(default)]
    last_seen: i64,
}

impl WordRecord {
    /// A never-seen word with zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rehydrate a record from stored values.
    #[must_use]
    pub fn from_persisted(mistakes: u32, correct_count: u32, last_seen: i64) -> Self {
        Self {
            mistakes,
            correct_count,
            last_seen,
        }
    }

    #[must_use]
    pub fn mistakes(&self) -> u32 {
        self.mistakes
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    #[must_use]
    pub fn last_seen(&self) -> i64 {
        self.last_seen
    }

    /// Words with at least one recorded mistake belong to the review queue.
    #[must_use]
    pub fn needs_review(&self) -> bool {
        self.mistakes > 0
    }

    pub fn record_mistake(&mut self, at: i64) {
        self.mistakes = self.mistakes.saturating_add(1);
        self.last_seen = at;
    }

    pub fn record_correct(&mut self, at: i64) {
        self.correct_count = self.correct_count.saturating_add(1);
        self.last_seen = at;
    }

    /// Zero every counter, returning the word to its never-seen state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
