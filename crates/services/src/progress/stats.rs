//! Summary counters and progress resets.

use serde::Serialize;
use tracing::info;

use vocab_core::queue::completion_percentage;
use vocab_core::stats::WordTotals;

use super::service::Change;
use super::session::ProgressSession;
use crate::error::ProgressError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsReport {
    pub total: usize,
    pub known: usize,
    pub review: usize,
    pub total_mistakes: u64,
    pub total_correct: u64,
    /// Correct answers over all answers, `100` before the first answer.
    pub accuracy: f64,
    pub current_position: usize,
    pub completion_percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResetSummary {
    pub reset_mistakes: bool,
    pub reset_position: bool,
    pub words_reset: usize,
}

impl ProgressSession {
    /// Aggregate counters for the active user.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::NoActiveUser` without an active user.
    pub fn stats(&self) -> Result<StatsReport, ProgressError> {
        let doc = self.bound()?;
        let totals = WordTotals::from_document(doc);
        let position = doc.learn_position();
        Ok(StatsReport {
            total: totals.total_words,
            known: totals.known_words,
            review: totals.review_needed,
            total_mistakes: totals.total_mistakes,
            total_correct: totals.total_correct,
            accuracy: totals.attempt_accuracy(),
            current_position: position,
            completion_percentage: completion_percentage(position, totals.total_words),
        })
    }

    /// Zero word counters and/or the learn cursor, persisting once.
    ///
    /// `reset_position` only rewinds the learn cursor; a review cursor left
    /// past the shrunken review queue is repaired on the next review page.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::NoActiveUser` without an active user, or the
    /// storage error if the reset cannot be saved.
    pub async fn reset_progress(
        &mut self,
        reset_mistakes: bool,
        reset_position: bool,
    ) -> Result<ResetSummary, ProgressError> {
        self.commit(|doc, _| {
            let words_reset = if reset_mistakes {
                doc.reset_counters()
            } else {
                0
            };
            if reset_position {
                doc.set_learn_position(0);
            }
            info!(
                user = %doc.username(),
                reset_mistakes,
                reset_position,
                words_reset,
                "progress reset"
            );
            Change::saved(ResetSummary {
                reset_mistakes,
                reset_position,
                words_reset,
            })
        })
        .await
    }
}
