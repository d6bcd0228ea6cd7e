//! # Offset Pagination
//!
//! Fixed-size pages over a result list.
//!
//! ```text
//! page 1 → rows [ 0, 10)   OFFSET 0
//! page 2 → rows [10, 20)   OFFSET 10
//! page N → rows [(N-1)*10, N*10)
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationResult};
use crate::validation::validate_page;

/// Number of films per page.
pub const PAGE_SIZE: u32 = 10;

/// A 1-based page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Page(u32);

impl Page {
    /// Creates a page, rejecting page 0.
    pub fn new(number: u32) -> ValidationResult<Self> {
        if number == 0 {
            return Err(ValidationError::MustBePositive {
                field: "page".to_string(),
            });
        }
        Ok(Page(number))
    }

    /// The first page.
    pub const fn first() -> Self {
        Page(1)
    }

    /// Builds a page from a raw request parameter, falling back to page 1.
    pub fn from_param(raw: Option<&str>) -> Self {
        // validate_page never returns 0
        Page(validate_page(raw))
    }

    #[inline]
    pub const fn number(&self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_first(&self) -> bool {
        self.0 == 1
    }

    /// Row offset of the first film on this page.
    #[inline]
    pub fn offset(&self) -> i64 {
        (i64::from(self.0) - 1) * i64::from(PAGE_SIZE)
    }

    /// Row limit for this page.
    #[inline]
    pub fn limit(&self) -> i64 {
        i64::from(PAGE_SIZE)
    }

    /// Number of pages needed for `total` results (at least 1).
    pub fn total_pages(total: i64) -> u32 {
        if total <= 0 {
            return 1;
        }
        let pages = (total + i64::from(PAGE_SIZE) - 1) / i64::from(PAGE_SIZE);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Whether a page follows this one.
    pub fn has_next(&self, total: i64) -> bool {
        self.0 < Page::total_pages(total)
    }

    pub fn has_previous(&self) -> bool {
        self.0 > 1
    }
}

impl Default for Page {
    fn default() -> Self {
        Page::first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets() {
        assert_eq!(Page::first().offset(), 0);
        assert_eq!(Page::new(2).unwrap().offset(), 10);
        assert_eq!(Page::new(7).unwrap().offset(), 60);
        assert_eq!(Page::new(7).unwrap().limit(), 10);
    }

    #[test]
    fn test_page_zero_is_rejected() {
        assert!(matches!(
            Page::new(0),
            Err(ValidationError::MustBePositive { .. })
        ));
    }

    #[test]
    fn test_from_param() {
        assert_eq!(Page::from_param(Some("4")).number(), 4);
        assert_eq!(Page::from_param(Some("0")), Page::first());
        assert_eq!(Page::from_param(Some("abc")), Page::first());
        assert_eq!(Page::from_param(None), Page::first());
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(Page::total_pages(0), 1);
        assert_eq!(Page::total_pages(1), 1);
        assert_eq!(Page::total_pages(10), 1);
        assert_eq!(Page::total_pages(11), 2);
        assert_eq!(Page::total_pages(1000), 100);
    }

    #[test]
    fn test_navigation() {
        let page = Page::new(2).unwrap();
        assert!(page.has_previous());
        assert!(page.has_next(21));
        assert!(!page.has_next(20));
        assert!(!Page::first().has_previous());
    }
}
