//! Shared query parameter types for API handlers.

use feedgrid_core::error::CoreError;
use feedgrid_core::pagination::{PageRequest, DEFAULT_PAGE_SIZE};
use serde::Deserialize;

/// Generic pagination parameters (`?size=&page=`).
///
/// Used by every paginated listing. Omitted values fall back to the first
/// page of twenty; supplied values are validated (`size > 0`, `page >= 0`).
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub size: Option<i64>,
    pub page: Option<i64>,
}

impl PageParams {
    pub fn validated(&self) -> Result<PageRequest, CoreError> {
        PageRequest::new(
            self.size.unwrap_or(DEFAULT_PAGE_SIZE),
            self.page.unwrap_or(0),
        )
    }

    /// For listings where omitting both parameters means "no pagination"
    /// rather than the default page.
    pub fn validated_opt(&self) -> Result<Option<PageRequest>, CoreError> {
        if self.size.is_none() && self.page.is_none() {
            Ok(None)
        } else {
            self.validated().map(Some)
        }
    }
}
