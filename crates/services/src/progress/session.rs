use std::fmt;

use tracing::debug;

use vocab_core::model::{UserDocument, Username};

use super::service::{Change, ProgressService};
use crate::error::ProgressError;

/// Explicit handle for one caller's progress work.
///
/// Holds the document of the active user. Reads are answered from this
/// snapshot; every mutation reloads the stored document under the user's
/// lock, applies the change, saves it and rebinds the fresh copy here.
pub struct ProgressSession {
    service: ProgressService,
    active: Option<UserDocument>,
}

impl ProgressSession {
    pub(crate) fn new(service: ProgressService) -> Self {
        Self {
            service,
            active: None,
        }
    }

    /// Bind `username`'s document, discarding the previous one.
    ///
    /// An empty name clears the session without error. On failure the
    /// previously bound document stays active.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::InvalidUsername` for a malformed name,
    /// `ProgressError::UnknownUser` if the user has no document, or
    /// `ProgressError::Storage` if the store cannot be read.
    pub async fn set_active_user(&mut self, username: &str) -> Result<(), ProgressError> {
        if username.is_empty() {
            self.clear();
            return Ok(());
        }
        let username = Username::parse(username)?;
        let doc = self.service.load(&username).await?;
        debug!(user = %username, words = doc.word_count(), "activated user");
        self.active = Some(doc);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.active = None;
    }

    #[must_use]
    pub fn active_user(&self) -> Option<&Username> {
        self.active.as_ref().map(UserDocument::username)
    }

    #[must_use]
    pub fn document(&self) -> Option<&UserDocument> {
        self.active.as_ref()
    }

    pub(crate) fn bound(&self) -> Result<&UserDocument, ProgressError> {
        self.active.as_ref().ok_or(ProgressError::NoActiveUser)
    }

    pub(crate) async fn commit<T, F>(&mut self, apply: F) -> Result<T, ProgressError>
    where
        F: FnOnce(&mut UserDocument, i64) -> Change<T>,
    {
        let username = self.bound()?.username().clone();
        let (doc, value) = self.service.mutate(&username, apply).await?;
        self.active = Some(doc);
        Ok(value)
    }
}

impl fmt::Debug for ProgressSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressSession")
            .field("active_user", &self.active_user())
            .field(
                "words_len",
                &self.active.as_ref().map(UserDocument::word_count),
            )
            .finish_non_exhaustive()
    }
}
