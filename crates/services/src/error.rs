//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;
use vocab_core::model::{PageRequestError, Username, UsernameError};

/// Errors emitted by the progress engine.
///
/// Stale review cursors are repaired in place and never reported.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("no user data loaded")]
    NoActiveUser,
    #[error("user {0} does not exist")]
    UnknownUser(Username),
    #[error(transparent)]
    InvalidArgument(#[from] PageRequestError),
    #[error(transparent)]
    InvalidUsername(#[from] UsernameError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ProgressError {
    pub(crate) fn from_load(username: &Username, err: StorageError) -> Self {
        match err {
            StorageError::NotFound => Self::UnknownUser(username.clone()),
            other => Self::Storage(other),
        }
    }
}

/// Errors emitted by `AccountService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AccountError {
    #[error(transparent)]
    InvalidUsername(#[from] UsernameError),
    #[error("user {0} already exists")]
    AlreadyExists(Username),
    #[error("user {0} does not exist")]
    UnknownUser(Username),
    #[error("cannot delete currently logged in user {0}")]
    UserActive(Username),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
