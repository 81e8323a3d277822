mod activity;
mod batch;
mod cursor;
mod pagination;
mod service;
mod session;
mod stats;

// Public API of the progress engine.
pub use crate::error::ProgressError;
pub use activity::SessionKind;
pub use pagination::{ExamWords, LearnPage, LearnProgress, ReviewListing, ReviewPage, ReviewProgress};
pub use service::ProgressService;
pub use session::ProgressSession;
pub use stats::{ResetSummary, StatsReport};
