use std::num::NonZeroUsize;

use thiserror::Error;

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const DEFAULT_EXAM_COUNT: usize = 20;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PageRequestError {
    #[error("page must be >= 0, got {0}")]
    NegativePage(i64),

    #[error("page size must be > 0, got {0}")]
    NonPositivePageSize(i64),

    #[error("word count must be >= 0, got {0}")]
    NegativeCount(i64),
}

/// A validated `(page, page_size)` pair.
///
/// Pages are 1-based; page `0` asks the engine to resume from the stored
/// cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: usize,
    page_size: NonZeroUsize,
}

impl PageRequest {
    /// Validate raw transport integers.
    ///
    /// # Errors
    ///
    /// Returns `PageRequestError` for a negative page or a page size <= 0.
    pub fn new(page: i64, page_size: i64) -> Result<Self, PageRequestError> {
        let page = usize::try_from(page).map_err(|_| PageRequestError::NegativePage(page))?;
        let size = usize::try_from(page_size)
            .ok()
            .and_then(NonZeroUsize::new)
            .ok_or(PageRequestError::NonPositivePageSize(page_size))?;
        Ok(Self {
            page,
            page_size: size,
        })
    }

    #[must_use]
    pub fn page(&self) -> usize {
        self.page
    }

    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size.get()
    }

    #[must_use]
    pub fn is_resume(&self) -> bool {
        self.page == 0
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: NonZeroUsize::new(DEFAULT_PAGE_SIZE).unwrap_or(NonZeroUsize::MIN),
        }
    }
}

/// Validate a raw exam word count.
///
/// # Errors
///
/// Returns `PageRequestError::NegativeCount` when `count < 0`.
pub fn exam_count(count: i64) -> Result<usize, PageRequestError> {
    usize::try_from(count).map_err(|_| PageRequestError::NegativeCount(count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_resume_and_explicit_pages() {
        let resume = PageRequest::new(0, 10).unwrap();
        assert!(resume.is_resume());
        assert_eq!(resume.page_size(), 10);

        let third = PageRequest::new(3, 25).unwrap();
        assert_eq!(third.page(), 3);
        assert!(!third.is_resume());
    }

    #[test]
    fn rejects_negative_page_and_non_positive_size() {
        assert_eq!(
            PageRequest::new(-1, 10).unwrap_err(),
            PageRequestError::NegativePage(-1)
        );
        assert_eq!(
            PageRequest::new(1, 0).unwrap_err(),
            PageRequestError::NonPositivePageSize(0)
        );
        assert_eq!(
            PageRequest::new(1, -5).unwrap_err(),
            PageRequestError::NonPositivePageSize(-5)
        );
    }

    #[test]
    fn default_is_first_page_of_twenty() {
        let request = PageRequest::default();
        assert_eq!(request.page(), 1);
        assert_eq!(request.page_size(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn exam_count_rejects_negatives() {
        assert_eq!(exam_count(0).unwrap(), 0);
        assert_eq!(exam_count(-3).unwrap_err(), PageRequestError::NegativeCount(-3));
    }
}
