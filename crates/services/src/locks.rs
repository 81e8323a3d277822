use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use vocab_core::model::Username;

/// One async mutex per username.
///
/// Every read-modify-write of a user document runs while holding that
/// user's guard, so concurrent sessions for the same user are serialized
/// and never overwrite each other's saves. Different users never contend.
#[derive(Debug, Default)]
pub struct UserLocks {
    inner: Mutex<HashMap<Username, Arc<AsyncMutex<()>>>>,
}

impl UserLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `username`'s document.
    pub async fn acquire(&self, username: &Username) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(map.entry(username.clone()).or_default())
        };
        lock.lock_owned().await
    }
}
