//! Read-only aggregates derived from a user document.

use serde::Serialize;

use crate::model::UserDocument;

/// Counter totals over every word of a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WordTotals {
    pub total_words: usize,
    /// Words with at least one mistake.
    pub review_needed: usize,
    pub known_words: usize,
    pub total_mistakes: u64,
    pub total_correct: u64,
}

impl WordTotals {
    #[must_use]
    pub fn from_document(doc: &UserDocument) -> Self {
        let mut totals = Self {
            total_words: doc.word_count(),
            ..Self::default()
        };
        for record in doc.words().values() {
            if record.needs_review() {
                totals.review_needed += 1;
            }
            totals.total_mistakes += u64::from(record.mistakes());
            totals.total_correct += u64::from(record.correct_count());
        }
        totals.known_words = totals.total_words - totals.review_needed;
        totals
    }

    /// Share of words without any mistake, in percent. `0` with no words.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn learn_accuracy(&self) -> f64 {
        if self.total_words == 0 {
            return 0.0;
        }
        self.known_words as f64 / self.total_words as f64 * 100.0
    }

    /// Share of correct answers among all recorded answers, in percent.
    /// `100` before any answer has been recorded.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn attempt_accuracy(&self) -> f64 {
        let attempts = self.total_correct + self.total_mistakes;
        if attempts == 0 {
            return 100.0;
        }
        self.total_correct as f64 / attempts as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnswerOutcome, Username, Vocabulary};

    fn doc() -> UserDocument {
        let vocab: Vocabulary = ["apple", "banana", "cherry", "date"].into_iter().collect();
        UserDocument::bootstrap(Username::parse("tester").unwrap(), &vocab, 0)
    }

    #[test]
    fn fresh_document_has_full_attempt_accuracy() {
        let totals = WordTotals::from_document(&doc());
        assert_eq!(totals.total_words, 4);
        assert_eq!(totals.known_words, 4);
        assert_eq!(totals.review_needed, 0);
        assert_eq!(totals.attempt_accuracy(), 100.0);
        assert_eq!(totals.learn_accuracy(), 100.0);
    }

    #[test]
    fn both_accuracy_definitions_follow_counters() {
        let mut doc = doc();
        doc.record_answers(&["apple", "apple", "banana"], AnswerOutcome::Mistake, 1);
        doc.record_answers(&["cherry", "date", "apple"], AnswerOutcome::Correct, 2);

        let totals = WordTotals::from_document(&doc);
        assert_eq!(totals.review_needed, 2);
        assert_eq!(totals.known_words, 2);
        assert_eq!(totals.total_mistakes, 3);
        assert_eq!(totals.total_correct, 3);
        assert!((totals.learn_accuracy() - 50.0).abs() < f64::EPSILON);
        assert!((totals.attempt_accuracy() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_document_reports_zero_learn_accuracy() {
        let empty = UserDocument::bootstrap(
            Username::parse("nobody").unwrap(),
            &Vocabulary::default(),
            0,
        );
        assert_eq!(WordTotals::from_document(&empty).learn_accuracy(), 0.0);
    }
}
