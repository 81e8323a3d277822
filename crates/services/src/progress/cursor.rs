//! Resumable learn and review offsets.

use tracing::debug;

use super::service::Change;
use super::session::ProgressSession;
use crate::error::ProgressError;

impl ProgressSession {
    /// Start offset of the last learn page served; `0` without an active user.
    #[must_use]
    pub fn learn_position(&self) -> usize {
        self.document().map_or(0, |doc| doc.learn_position())
    }

    /// Offset into the review queue; `0` without an active user.
    #[must_use]
    pub fn review_position(&self) -> usize {
        self.document().map_or(0, |doc| doc.review_position())
    }

    /// Store a new learn offset and persist the document.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::NoActiveUser` without an active user, or the
    /// storage error if the document cannot be saved.
    pub async fn set_learn_position(&mut self, position: usize) -> Result<(), ProgressError> {
        self.commit(|doc, _| {
            debug!(user = %doc.username(), position, "learn cursor set");
            doc.set_learn_position(position);
            Change::saved(())
        })
        .await
    }

    /// Store a new review offset and persist the document.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::NoActiveUser` without an active user, or the
    /// storage error if the document cannot be saved.
    pub async fn set_review_position(&mut self, position: usize) -> Result<(), ProgressError> {
        self.commit(|doc, _| {
            debug!(user = %doc.username(), position, "review cursor set");
            doc.set_review_position(position);
            Change::saved(())
        })
        .await
    }
}
