use std::sync::Arc;

use storage::repository::Storage;
use vocab_core::model::Vocabulary;

use crate::Clock;
use crate::account_service::AccountService;
use crate::error::AppServicesError;
use crate::locks::UserLocks;
use crate::progress::ProgressService;

/// Assembles app-facing services over one store and one lock registry.
#[derive(Clone)]
pub struct AppServices {
    progress: ProgressService,
    accounts: AccountService,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        vocabulary: Vocabulary,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage, vocabulary, clock))
    }

    /// Build services over an existing storage backend.
    #[must_use]
    pub fn from_storage(storage: &Storage, vocabulary: Vocabulary, clock: Clock) -> Self {
        let locks = Arc::new(UserLocks::new());
        let progress = ProgressService::new(
            clock,
            Arc::clone(&storage.documents),
            Arc::clone(&locks),
        );
        let accounts = AccountService::new(
            clock,
            Arc::clone(&storage.documents),
            Arc::new(vocabulary),
            locks,
        );
        Self { progress, accounts }
    }

    #[must_use]
    pub fn progress(&self) -> &ProgressService {
        &self.progress
    }

    #[must_use]
    pub fn accounts(&self) -> &AccountService {
        &self.accounts
    }
}
