use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::info;

use vocab_core::model::UserInfo;

use super::service::Change;
use super::session::ProgressSession;
use crate::error::ProgressError;

/// The kind of study session being reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    Learn,
    Exam,
    Review,
}

impl SessionKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Learn => "learn",
            Self::Exam => "exam",
            Self::Review => "review",
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "learn" => Ok(Self::Learn),
            "exam" => Ok(Self::Exam),
            "review" => Ok(Self::Review),
            other => Err(format!("unknown session kind: {other}")),
        }
    }
}

impl ProgressSession {
    /// Add a finished session's duration to the user's study time.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::NoActiveUser` without an active user, or the
    /// storage error if the update cannot be saved.
    pub async fn record_learning_session(
        &mut self,
        kind: SessionKind,
        words_count: usize,
        correct_count: usize,
        duration_secs: u64,
    ) -> Result<(), ProgressError> {
        self.commit(|doc, now| {
            doc.user_info_mut().record_activity(duration_secs, now);
            info!(
                user = %doc.username(),
                %kind,
                words_count,
                correct_count,
                duration_secs,
                "recorded learning session"
            );
            Change::saved(())
        })
        .await
    }

    /// Account metadata of the active user.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::NoActiveUser` without an active user.
    pub fn learning_history(&self) -> Result<&UserInfo, ProgressError> {
        Ok(self.bound()?.user_info())
    }
}
