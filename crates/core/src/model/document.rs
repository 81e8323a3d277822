use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::user::UserInfo;
use super::username::Username;
use super::vocabulary::Vocabulary;
use super::word::WordRecord;

/// Which counter a batch of answers increments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    Mistake,
    Correct,
}

/// How many words of a batch matched the document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchTally {
    pub updated: usize,
    pub skipped: usize,
}

/// The complete persisted state for one user.
///
/// Words are kept in a `BTreeMap`, so iteration order is the lexicographic
/// learn order. The document is always loaded and stored as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDocument {
    user_info: UserInfo,
    words: BTreeMap<String, WordRecord>,
}

impl UserDocument {
    /// Fresh document for a new account with every vocabulary word unseen.
    #[must_use]
    pub fn bootstrap(username: Username, vocabulary: &Vocabulary, now: i64) -> Self {
        Self {
            user_info: UserInfo::new(username, now),
            words: vocabulary
                .iter()
                .map(|word| (word.to_owned(), WordRecord::new()))
                .collect(),
        }
    }

    #[must_use]
    pub fn from_parts(user_info: UserInfo, words: BTreeMap<String, WordRecord>) -> Self {
        Self { user_info, words }
    }

    #[must_use]
    pub fn username(&self) -> &Username {
        &self.user_info.username
    }

    #[must_use]
    pub fn user_info(&self) -> &UserInfo {
        &self.user_info
    }

    pub fn user_info_mut(&mut self) -> &mut UserInfo {
        &mut self.user_info
    }

    #[must_use]
    pub fn words(&self) -> &BTreeMap<String, WordRecord> {
        &self.words
    }

    #[must_use]
    pub fn word(&self, word: &str) -> Option<&WordRecord> {
        self.words.get(word)
    }

    #[must_use]
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn learn_position(&self) -> usize {
        self.user_info.last_learn_position
    }

    pub fn set_learn_position(&mut self, position: usize) {
        self.user_info.last_learn_position = position;
    }

    #[must_use]
    pub fn review_position(&self) -> usize {
        self.user_info.last_review_position
    }

    pub fn set_review_position(&mut self, position: usize) {
        self.user_info.last_review_position = position;
    }

    /// Apply one answer per listed word.
    ///
    /// A word listed `k` times is incremented `k` times. Words missing from the
    /// document are skipped.
    pub fn record_answers<S: AsRef<str>>(
        &mut self,
        words: &[S],
        outcome: AnswerOutcome,
        at: i64,
    ) -> BatchTally {
        let mut tally = BatchTally::default();
        for word in words {
            match self.words.get_mut(word.as_ref()) {
                Some(record) => {
                    match outcome {
                        AnswerOutcome::Mistake => record.record_mistake(at),
                        AnswerOutcome::Correct => record.record_correct(at),
                    }
                    tally.updated += 1;
                }
                None => tally.skipped += 1,
            }
        }
        tally
    }

    /// Zero the counters of every word and return how many words had
    /// mistakes beforehand.
    pub fn reset_counters(&mut self) -> usize {
        let mut had_mistakes = 0;
        for record in self.words.values_mut() {
            if record.needs_review() {
                had_mistakes += 1;
            }
            record.reset();
        }
        had_mistakes
    }
}
