use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use vocab_core::model::{UserDocument, Username};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Listing row for one stored account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSummaryRecord {
    pub username: Username,
    pub created_at: i64,
    pub last_login: i64,
}

impl UserSummaryRecord {
    #[must_use]
    pub fn from_document(doc: &UserDocument) -> Self {
        Self {
            username: doc.username().clone(),
            created_at: doc.user_info().created_at,
            last_login: doc.user_info().last_login,
        }
    }
}

/// Repository contract for per-user progress documents.
///
/// Documents are read and written whole. A failed save must leave the
/// previously stored document untouched.
#[async_trait]
pub trait UserDocumentRepository: Send + Sync {
    /// Fetch the document stored for `username`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the user has no document yet,
    /// `StorageError::Serialization` if the stored document is corrupt, or
    /// `StorageError::Connection` if the backend cannot be read.
    async fn load_document(&self, username: &Username) -> Result<UserDocument, StorageError>;

    /// Replace (or create) the document keyed by its username.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the document cannot be stored.
    async fn save_document(&self, document: &UserDocument) -> Result<(), StorageError>;

    /// Store a document only if none exists for its username yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the user already has a document.
    async fn insert_new_document(&self, document: &UserDocument) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be queried.
    async fn document_exists(&self, username: &Username) -> Result<bool, StorageError>;

    /// Every stored account, most recent login first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be queried.
    async fn list_users(&self) -> Result<Vec<UserSummaryRecord>, StorageError>;

    /// Remove the document stored for `username`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if there is nothing to delete.
    async fn delete_document(&self, username: &Username) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    documents: Arc<Mutex<HashMap<Username, UserDocument>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            documents: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl UserDocumentRepository for InMemoryRepository {
    async fn load_document(&self, username: &Username) -> Result<UserDocument, StorageError> {
        let guard = self
            .documents
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.get(username).cloned().ok_or(StorageError::NotFound)
    }

    async fn save_document(&self, document: &UserDocument) -> Result<(), StorageError> {
        let mut guard = self
            .documents
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(document.username().clone(), document.clone());
        Ok(())
    }

    async fn insert_new_document(&self, document: &UserDocument) -> Result<(), StorageError> {
        let mut guard = self
            .documents
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        if guard.contains_key(document.username()) {
            return Err(StorageError::Conflict);
        }
        guard.insert(document.username().clone(), document.clone());
        Ok(())
    }

    async fn document_exists(&self, username: &Username) -> Result<bool, StorageError> {
        let guard = self
            .documents
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.contains_key(username))
    }

    async fn list_users(&self) -> Result<Vec<UserSummaryRecord>, StorageError> {
        let guard = self
            .documents
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut users: Vec<_> = guard.values().map(UserSummaryRecord::from_document).collect();
        users.sort_by(|a, b| {
            b.last_login
                .cmp(&a.last_login)
                .then_with(|| a.username.cmp(&b.username))
        });
        Ok(users)
    }

    async fn delete_document(&self, username: &Username) -> Result<(), StorageError> {
        let mut guard = self
            .documents
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard
            .remove(username)
            .map(|_| ())
            .ok_or(StorageError::NotFound)
    }
}

/// Document repository behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub documents: Arc<dyn UserDocumentRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let documents: Arc<dyn UserDocumentRepository> = Arc::new(InMemoryRepository::new());
        Self { documents }
    }
}
