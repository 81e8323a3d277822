use serde::{Deserialize, Serialize};

use super::username::Username;

/// Account metadata and resumable cursors stored alongside the word map.
///
/// Only the two positions take part in progress logic; the remaining
/// counters and timestamps are advisory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub username: Username,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub last_login: i64,
    #[serde(default)]
    pub last_activity: i64,
    #[serde(default)]
    pub last_learn_position: usize,
    #[serde(default)]
    pub last_review_position: usize,
    #[serde(default)]
    pub total_sessions: u64,
    /// Accumulated study time in seconds.
    #[serde(default)]
    pub total_learning_time: u64,
}

impl UserInfo {
    #[must_use]
    pub fn new(username: Username, now: i64) -> Self {
        Self {
            username,
            created_at: now,
            last_login: now,
            last_activity: 0,
            last_learn_position: 0,
            last_review_position: 0,
            total_sessions: 0,
            total_learning_time: 0,
        }
    }

    /// Stamp a login: bumps the session counter and `last_login`.
    pub fn record_login(&mut self, now: i64) {
        self.last_login = now;
        self.total_sessions = self.total_sessions.saturating_add(1);
    }

    pub fn record_activity(&mut self, duration_secs: u64, now: i64) {
        self.total_learning_time = self.total_learning_time.saturating_add(duration_secs);
        self.last_activity = now;
    }
}
