//! Bulk mistake/correct increments.

use tracing::info;

use vocab_core::model::{AnswerOutcome, BatchTally};

use super::service::Change;
use super::session::ProgressSession;
use crate::error::ProgressError;

impl ProgressSession {
    /// Add one mistake per listed word and stamp `last_seen`.
    ///
    /// The stored document is reloaded first, so increments made by other
    /// sessions of the same user are kept. Unknown words are skipped.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::NoActiveUser` without an active user, or the
    /// storage error if the batch cannot be saved; nothing is applied then.
    pub async fn update_mistakes_batch<S>(&mut self, words: &[S]) -> Result<BatchTally, ProgressError>
    where
        S: AsRef<str> + Sync,
    {
        self.apply_batch(words, AnswerOutcome::Mistake).await
    }

    /// Add one correct answer per listed word and stamp `last_seen`.
    ///
    /// # Errors
    ///
    /// Same as [`ProgressSession::update_mistakes_batch`].
    pub async fn update_correct_batch<S>(&mut self, words: &[S]) -> Result<BatchTally, ProgressError>
    where
        S: AsRef<str> + Sync,
    {
        self.apply_batch(words, AnswerOutcome::Correct).await
    }

    async fn apply_batch<S>(
        &mut self,
        words: &[S],
        outcome: AnswerOutcome,
    ) -> Result<BatchTally, ProgressError>
    where
        S: AsRef<str> + Sync,
    {
        self.commit(|doc, now| {
            let tally = doc.record_answers(words, outcome, now);
            info!(
                user = %doc.username(),
                ?outcome,
                updated = tally.updated,
                skipped = tally.skipped,
                "applied answer batch"
            );
            Change::saved(tally)
        })
        .await
    }
}
