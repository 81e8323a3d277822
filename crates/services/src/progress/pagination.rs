//! Learn and review queues sliced into resumable pages.

use rand::rng;
use rand::seq::SliceRandom;
use serde::Serialize;
use tracing::debug;

use vocab_core::model::{PageRequest, UserDocument, Username};
use vocab_core::queue::{
    ReviewEntry, completion_percentage, learn_queue, page_bounds, page_containing, review_queue,
    total_pages,
};

use super::service::Change;
use super::session::ProgressSession;
use crate::error::ProgressError;

const LEARN_COMPLETED: &str = "Congratulations! You have completed all words.";
const REVIEW_COMPLETED: &str = "Congratulations! You have reviewed all mistake words.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LearnProgress {
    pub current_position: usize,
    pub total_words: usize,
    pub completion_percentage: f64,
}

/// One page of the lexicographic learn queue.
///
/// A page past the end comes back empty with `completed` set and no
/// progress block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LearnPage {
    pub username: Username,
    pub words: Vec<String>,
    #[serde(rename = "totalPages")]
    pub total_pages: usize,
    #[serde(rename = "currentPage")]
    pub current_page: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<LearnProgress>,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewProgress {
    pub current_position: usize,
    pub total_review_words: usize,
    pub completion_percentage: f64,
}

/// One page of the error-ranked review queue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewPage {
    pub username: Username,
    pub review_words: Vec<ReviewEntry>,
    #[serde(rename = "totalPages")]
    pub total_pages: usize,
    #[serde(rename = "currentPage")]
    pub current_page: usize,
    pub total_review: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<ReviewProgress>,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

/// The whole review queue, unpaginated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewListing {
    pub review_words: Vec<ReviewEntry>,
    pub total_review: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExamWords {
    pub words: Vec<String>,
}

impl ProgressSession {
    /// Serve a page of the learn queue.
    ///
    /// Page `0` resumes at the page holding the stored learn cursor. Serving
    /// a page moves the cursor to the page's first index, so an interrupted
    /// session comes back to the same page. A page past the end leaves the
    /// cursor alone.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::NoActiveUser` without an active user, or a
    /// storage error if the moved cursor cannot be saved.
    pub async fn learn_page(&mut self, request: PageRequest) -> Result<LearnPage, ProgressError> {
        self.commit(|doc, _| serve_learn_page(doc, request)).await
    }

    /// Serve a page of the review queue.
    ///
    /// Page `0`, or page `1` while a review cursor is stored, resumes at the
    /// cursor. A cursor past the end of the queue is reset to `0`. Serving
    /// the final page rewinds the cursor so the next review starts from the
    /// top of the list.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::NoActiveUser` without an active user, or a
    /// storage error if the cursor cannot be saved.
    pub async fn review_page(
        &mut self,
        request: PageRequest,
    ) -> Result<ReviewPage, ProgressError> {
        self.commit(|doc, _| serve_review_page(doc, request)).await
    }

    /// The full review queue for a sidebar view. Never touches a cursor.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::NoActiveUser` without an active user.
    pub fn all_review_words(&self) -> Result<ReviewListing, ProgressError> {
        let review_words = review_queue(self.bound()?);
        Ok(ReviewListing {
            total_review: review_words.len(),
            review_words,
        })
    }

    /// Up to `count` distinct words drawn uniformly at random.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::NoActiveUser` without an active user.
    pub fn exam_words(&self, count: usize) -> Result<ExamWords, ProgressError> {
        let mut words: Vec<String> = learn_queue(self.bound()?)
            .into_iter()
            .map(str::to_owned)
            .collect();
        if words.len() > count {
            words.shuffle(&mut rng());
            words.truncate(count);
        }
        Ok(ExamWords { words })
    }
}

fn serve_learn_page(doc: &mut UserDocument, request: PageRequest) -> Change<LearnPage> {
    let size = request.page_size();
    let username = doc.username().clone();
    let page = if request.is_resume() {
        page_containing(doc.learn_position(), size)
    } else {
        request.page()
    };

    let queue = learn_queue(doc);
    let total = queue.len();
    let total_pages = total_pages(total, size);

    let Some(range) = page_bounds(page, size, total) else {
        return Change::unchanged(LearnPage {
            username,
            words: Vec::new(),
            total_pages,
            current_page: page,
            progress: None,
            completed: true,
            message: Some(LEARN_COMPLETED),
        });
    };

    let words: Vec<String> = queue[range.clone()].iter().map(|w| (*w).to_owned()).collect();
    doc.set_learn_position(range.start);
    debug!(user = %username, page, position = range.start, "served learn page");

    Change::saved(LearnPage {
        username,
        words,
        total_pages,
        current_page: page,
        progress: Some(LearnProgress {
            current_position: range.start,
            total_words: total,
            completion_percentage: completion_percentage(range.start, total),
        }),
        completed: false,
        message: None,
    })
}

fn serve_review_page(doc: &mut UserDocument, request: PageRequest) -> Change<ReviewPage> {
    let size = request.page_size();
    let username = doc.username().clone();
    let queue = review_queue(doc);
    let total = queue.len();
    let total_pages = total_pages(total, size);
    let mut persist = false;

    let mut page = request.page();
    let cursor = doc.review_position();
    if page == 0 || (page == 1 && cursor > 0) {
        let mut last = cursor;
        if last >= total {
            debug!(user = %username, cursor, total, "stale review cursor reset");
            last = 0;
            if cursor != 0 {
                doc.set_review_position(0);
                persist = true;
            }
        }
        page = page_containing(last, size);
    }

    let Some(range) = page_bounds(page, size, total) else {
        return Change::with_persist(
            ReviewPage {
                username,
                review_words: Vec::new(),
                total_pages,
                current_page: page,
                total_review: total,
                progress: None,
                completed: true,
                message: Some(REVIEW_COMPLETED),
            },
            persist,
        );
    };

    // The final page rewinds the cursor to the top of the list.
    let next_cursor = if range.end >= total { 0 } else { range.start };
    doc.set_review_position(next_cursor);
    debug!(user = %username, page, cursor = next_cursor, "served review page");

    let start = range.start;
    let review_words = queue.into_iter().skip(start).take(range.len()).collect();
    Change::saved(ReviewPage {
        username,
        review_words,
        total_pages,
        current_page: page,
        total_review: total,
        progress: Some(ReviewProgress {
            current_position: start,
            total_review_words: total,
            completion_percentage: completion_percentage(start, total),
        }),
        completed: false,
        message: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use vocab_core::model::{AnswerOutcome, Vocabulary};

    fn doc(words: &[&str]) -> UserDocument {
        let vocab: Vocabulary = words.iter().copied().collect();
        UserDocument::bootstrap(Username::parse("tester").unwrap(), &vocab, 0)
    }

    fn request(page: i64, size: i64) -> PageRequest {
        PageRequest::new(page, size).unwrap()
    }

    #[test]
    fn learn_pages_walk_the_sorted_queue() {
        let mut doc = doc(&["cherry", "apple", "banana"]);

        let first = serve_learn_page(&mut doc, request(1, 2)).value;
        assert_eq!(first.words, vec!["apple", "banana"]);
        assert_eq!(first.total_pages, 2);
        assert_eq!(first.current_page, 1);
        assert_eq!(doc.learn_position(), 0);

        let second = serve_learn_page(&mut doc, request(2, 2)).value;
        assert_eq!(second.words, vec!["cherry"]);
        assert_eq!(doc.learn_position(), 2);
        let progress = second.progress.unwrap();
        assert_eq!(progress.current_position, 2);
        assert_eq!(progress.total_words, 3);

        let done = serve_learn_page(&mut doc, request(3, 2));
        assert!(!done.persist);
        assert!(done.value.completed);
        assert!(done.value.words.is_empty());
        assert_eq!(doc.learn_position(), 2);
    }

    #[test]
    fn learn_resume_from_huge_cursor_is_past_the_end() {
        let mut doc = doc(&["a1", "a2", "a3"]);
        doc.set_learn_position(usize::MAX);

        let done = serve_learn_page(&mut doc, request(0, 1));
        assert!(!done.persist);
        assert!(done.value.completed);
        assert!(done.value.words.is_empty());
        assert_eq!(done.value.current_page, usize::MAX);
        assert_eq!(doc.learn_position(), usize::MAX);
    }

    #[test]
    fn learn_resume_serves_page_holding_cursor() {
        let mut doc = doc(&["a1", "a2", "a3", "a4", "a5"]);
        doc.set_learn_position(3);

        let page = serve_learn_page(&mut doc, request(0, 2)).value;
        assert_eq!(page.current_page, 2);
        assert_eq!(page.words, vec!["a3", "a4"]);
        assert_eq!(doc.learn_position(), 2);
    }

    #[test]
    fn review_final_page_rewinds_cursor() {
        let mut doc = doc(&["a", "b", "c"]);
        doc.record_answers(&["a", "b", "c"], AnswerOutcome::Mistake, 1);

        let first = serve_review_page(&mut doc, request(1, 2)).value;
        assert_eq!(first.review_words.len(), 2);
        assert_eq!(doc.review_position(), 0);

        let second = serve_review_page(&mut doc, request(2, 2)).value;
        assert_eq!(second.review_words.len(), 1);
        assert_eq!(doc.review_position(), 0);
    }

    #[test]
    fn review_resume_repairs_stale_cursor() {
        let mut doc = doc(&["a", "b"]);
        doc.record_answers(&["a"], AnswerOutcome::Mistake, 1);
        doc.set_review_position(7);

        let change = serve_review_page(&mut doc, request(1, 5));
        assert!(change.persist);
        assert_eq!(change.value.current_page, 1);
        assert_eq!(change.value.review_words[0].word, "a");
        assert_eq!(doc.review_position(), 0);
    }

    #[test]
    fn empty_review_queue_reports_completed_with_zero_progress() {
        let mut doc = doc(&["a", "b"]);
        let change = serve_review_page(&mut doc, request(0, 5));
        assert!(!change.persist);
        assert!(change.value.completed);
        assert_eq!(change.value.total_review, 0);
        assert_eq!(change.value.total_pages, 0);
        assert_eq!(change.value.current_page, 1);
    }
}
