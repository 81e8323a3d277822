mod document;
mod page;
mod user;
mod username;
mod vocabulary;
mod word;

pub use document::{AnswerOutcome, BatchTally, UserDocument};
pub use page::{DEFAULT_EXAM_COUNT, DEFAULT_PAGE_SIZE, PageRequest, PageRequestError, exam_count};
pub use user::UserInfo;
pub use username::{USERNAME_MAX_LEN, USERNAME_MIN_LEN, Username, UsernameError};
pub use vocabulary::Vocabulary;
pub use word::WordRecord;
