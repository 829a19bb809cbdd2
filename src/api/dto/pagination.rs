//! Page metadata for listings.

use serde::Serialize;
use utoipa::ToSchema;

use crate::config::PaginationConfig;

/// Pagination metadata attached to list responses.
///
/// Built from the requested page and limit, the total number of matching
/// records and the configured default limit. Invalid requests are normalized
/// rather than rejected:
/// - a limit of zero or below falls back to the default
/// - a page below 1 becomes 1, a page past the end becomes the last page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct PageMeta {
    #[schema(example = 25)]
    pub total_count: i64,
    #[schema(example = 1)]
    pub page: i64,
    #[schema(example = 10)]
    pub per_page: i64,
    #[schema(example = 3)]
    pub page_count: i64,
}

impl PageMeta {
    pub fn new(page: i64, limit: i64, total: i64, config: &PaginationConfig) -> Self {
        let per_page = if limit <= 0 {
            i64::from(config.default_limit)
        } else {
            limit
        };
        let total_count = total.max(0);
        let page_count = if total_count == 0 {
            0
        } else {
            (total_count - 1) / per_page + 1
        };

        let page = page.clamp(1, page_count.max(1));

        Self {
            total_count,
            page,
            per_page,
            page_count,
        }
    }

    /// Rows to skip for the current page.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }
}
