#![forbid(unsafe_code)]

pub mod account_service;
pub mod app_services;
pub mod error;
pub mod locks;
pub mod progress;

pub use vocab_core::Clock;

pub use account_service::{AccountService, LoginOutcome, UserList, UserListItem, UserProfileStats};
pub use app_services::AppServices;
pub use error::{AccountError, AppServicesError, ProgressError};
pub use locks::UserLocks;
pub use progress::{
    ExamWords, LearnPage, LearnProgress, ProgressService, ProgressSession, ResetSummary,
    ReviewListing, ReviewPage, ReviewProgress, SessionKind, StatsReport,
};
