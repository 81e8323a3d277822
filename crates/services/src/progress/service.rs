use std::sync::Arc;

use tracing::warn;

use storage::repository::UserDocumentRepository;
use vocab_core::model::{UserDocument, Username};

use super::session::ProgressSession;
use crate::Clock;
use crate::error::ProgressError;
use crate::locks::UserLocks;

/// Outcome of a document mutation: the value handed back to the caller and
/// whether the document has to be written back.
pub(crate) struct Change<T> {
    pub(crate) value: T,
    pub(crate) persist: bool,
}

impl<T> Change<T> {
    pub(crate) fn saved(value: T) -> Self {
        Self {
            value,
            persist: true,
        }
    }

    pub(crate) fn unchanged(value: T) -> Self {
        Self {
            value,
            persist: false,
        }
    }

    pub(crate) fn with_persist(value: T, persist: bool) -> Self {
        Self { value, persist }
    }
}

/// Shared engine state: the document store, the clock and the per-user locks.
///
/// Callers work through a [`ProgressSession`], which binds one user's
/// document at a time.
#[derive(Clone)]
pub struct ProgressService {
    clock: Clock,
    documents: Arc<dyn UserDocumentRepository>,
    locks: Arc<UserLocks>,
}

impl ProgressService {
    #[must_use]
    pub fn new(
        clock: Clock,
        documents: Arc<dyn UserDocumentRepository>,
        locks: Arc<UserLocks>,
    ) -> Self {
        Self {
            clock,
            documents,
            locks,
        }
    }

    /// Open a session with no active user.
    #[must_use]
    pub fn session(&self) -> ProgressSession {
        ProgressSession::new(self.clone())
    }

    pub(crate) async fn load(&self, username: &Username) -> Result<UserDocument, ProgressError> {
        self.documents
            .load_document(username)
            .await
            .map_err(|err| ProgressError::from_load(username, err))
    }

    /// Reload `username`'s document, apply `apply` and save the result, all
    /// while holding the user's lock.
    ///
    /// Returns the fresh document together with the mutation's value. If the
    /// save fails the stored document is left as it was.
    pub(crate) async fn mutate<T, F>(
        &self,
        username: &Username,
        apply: F,
    ) -> Result<(UserDocument, T), ProgressError>
    where
        F: FnOnce(&mut UserDocument, i64) -> Change<T>,
    {
        let _guard = self.locks.acquire(username).await;
        let mut doc = self.load(username).await?;
        let change = apply(&mut doc, self.clock.timestamp());
        if change.persist {
            if let Err(err) = self.documents.save_document(&doc).await {
                warn!(user = %username, error = %err, "failed to save user document");
                return Err(err.into());
            }
        }
        Ok((doc, change.value))
    }
}
