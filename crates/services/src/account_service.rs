use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use storage::repository::{StorageError, UserDocumentRepository};
use vocab_core::model::{UserDocument, Username, Vocabulary};
use vocab_core::stats::WordTotals;

use crate::Clock;
use crate::error::AccountError;
use crate::locks::UserLocks;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginOutcome {
    pub username: Username,
    pub is_new_user: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserListItem {
    pub username: Username,
    pub created_at: i64,
    pub last_login: i64,
    pub is_current: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserList {
    pub users: Vec<UserListItem>,
    pub total_users: usize,
    pub current_user: Option<Username>,
}

/// Per-account summary used on profile pages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfileStats {
    pub username: Username,
    pub total_words: usize,
    pub known_words: usize,
    pub review_needed: usize,
    pub total_mistakes: u64,
    /// Share of words without mistakes, in percent.
    pub accuracy: f64,
    pub total_sessions: u64,
    pub created_at: i64,
    pub last_login: i64,
}

/// Account directory: creates, lists and removes per-user documents.
#[derive(Clone)]
pub struct AccountService {
    clock: Clock,
    documents: Arc<dyn UserDocumentRepository>,
    vocabulary: Arc<Vocabulary>,
    locks: Arc<UserLocks>,
}

impl AccountService {
    #[must_use]
    pub fn new(
        clock: Clock,
        documents: Arc<dyn UserDocumentRepository>,
        vocabulary: Arc<Vocabulary>,
        locks: Arc<UserLocks>,
    ) -> Self {
        Self {
            clock,
            documents,
            vocabulary,
            locks,
        }
    }

    /// Log a user in, creating their document from the vocabulary on first use.
    ///
    /// Stamps `last_login` and bumps `total_sessions`.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::InvalidUsername` for a malformed name, or a
    /// storage error.
    pub async fn login(&self, username: &str) -> Result<LoginOutcome, AccountError> {
        let username = Username::parse(username)?;
        let _guard = self.locks.acquire(&username).await;
        let now = self.clock.timestamp();

        let (mut doc, is_new_user) = match self.documents.load_document(&username).await {
            Ok(doc) => (doc, false),
            Err(StorageError::NotFound) => (
                UserDocument::bootstrap(username.clone(), &self.vocabulary, now),
                true,
            ),
            Err(err) => return Err(err.into()),
        };
        doc.user_info_mut().record_login(now);
        self.documents.save_document(&doc).await?;

        if is_new_user {
            info!(user = %username, words = doc.word_count(), "created user");
        }
        Ok(LoginOutcome {
            username,
            is_new_user,
        })
    }

    /// Create a user without logging in.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::AlreadyExists` if the user has a document, or
    /// a storage error.
    pub async fn register(&self, username: &str) -> Result<Username, AccountError> {
        let username = Username::parse(username)?;
        let doc = UserDocument::bootstrap(username.clone(), &self.vocabulary, self.clock.timestamp());
        match self.documents.insert_new_document(&doc).await {
            Ok(()) => {
                info!(user = %username, words = doc.word_count(), "registered user");
                Ok(username)
            }
            Err(StorageError::Conflict) => Err(AccountError::AlreadyExists(username)),
            Err(err) => Err(err.into()),
        }
    }

    /// Every stored account, most recent login first.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the accounts cannot be listed.
    pub async fn list_users(&self, current: Option<&Username>) -> Result<UserList, AccountError> {
        let users: Vec<UserListItem> = self
            .documents
            .list_users()
            .await?
            .into_iter()
            .map(|record| UserListItem {
                is_current: current == Some(&record.username),
                username: record.username,
                created_at: record.created_at,
                last_login: record.last_login,
            })
            .collect();
        Ok(UserList {
            total_users: users.len(),
            users,
            current_user: current.cloned(),
        })
    }

    /// Delete a user's document. The active user cannot be deleted.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::UserActive` for the active user,
    /// `AccountError::UnknownUser` if there is no document, or a storage error.
    pub async fn delete_user(
        &self,
        username: &str,
        current: Option<&Username>,
    ) -> Result<Username, AccountError> {
        let username = Username::parse(username)?;
        if current == Some(&username) {
            return Err(AccountError::UserActive(username));
        }
        let _guard = self.locks.acquire(&username).await;
        match self.documents.delete_document(&username).await {
            Ok(()) => {
                info!(user = %username, "deleted user");
                Ok(username)
            }
            Err(StorageError::NotFound) => Err(AccountError::UnknownUser(username)),
            Err(err) => Err(err.into()),
        }
    }

    /// Summary counters for any stored user.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::UnknownUser` if there is no document, or a
    /// storage error.
    pub async fn user_stats(&self, username: &str) -> Result<UserProfileStats, AccountError> {
        let username = Username::parse(username)?;
        let doc = match self.documents.load_document(&username).await {
            Ok(doc) => doc,
            Err(StorageError::NotFound) => return Err(AccountError::UnknownUser(username)),
            Err(err) => return Err(err.into()),
        };
        let totals = WordTotals::from_document(&doc);
        let info = doc.user_info();
        Ok(UserProfileStats {
            total_words: totals.total_words,
            known_words: totals.known_words,
            review_needed: totals.review_needed,
            total_mistakes: totals.total_mistakes,
            accuracy: totals.learn_accuracy(),
            total_sessions: info.total_sessions,
            created_at: info.created_at,
            last_login: info.last_login,
            username,
        })
    }
}
