//! Pagination parameters shared by every listing operation.
//!
//! The convention across the API is `(size, page)` with `size > 0` and
//! `page >= 0`; results are ordered ascending by `(domain, id)`.

use serde::Deserialize;

use crate::error::CoreError;

/// Default page size when a caller omits `size`.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// A validated page request.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageRequest {
    pub size: i64,
    pub page: i64,
}

impl PageRequest {
    /// Build a page request, rejecting out-of-range values.
    pub fn new(size: i64, page: i64) -> Result<Self, CoreError> {
        if size <= 0 || page < 0 {
            return Err(CoreError::InvalidPagination { size, page });
        }
        Ok(Self { size, page })
    }

    /// SQL LIMIT value.
    pub fn limit(&self) -> i64 {
        self.size
    }

    /// SQL OFFSET value.
    pub fn offset(&self) -> i64 {
        self.size * self.page
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            size: DEFAULT_PAGE_SIZE,
            page: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::error::CoreError;

    #[test]
    fn test_valid_page_accepted() {
        let page = PageRequest::new(20, 0).unwrap();
        assert_eq!(page.limit(), 20);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn test_offset_scales_with_page() {
        let page = PageRequest::new(5, 3).unwrap();
        assert_eq!(page.offset(), 15);
    }

    #[test]
    fn test_zero_size_rejected() {
        assert_matches!(
            PageRequest::new(0, 0),
            Err(CoreError::InvalidPagination { size: 0, page: 0 })
        );
    }

    #[test]
    fn test_negative_size_rejected() {
        assert_matches!(PageRequest::new(-1, 0), Err(CoreError::InvalidPagination { .. }));
    }

    #[test]
    fn test_negative_page_rejected() {
        assert_matches!(PageRequest::new(10, -1), Err(CoreError::InvalidPagination { .. }));
    }

    #[test]
    fn test_default_is_first_page_of_twenty() {
        let page = PageRequest::default();
        assert_eq!(page.size, DEFAULT_PAGE_SIZE);
        assert_eq!(page.page, 0);
    }
}
