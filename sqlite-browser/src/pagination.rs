//! Page window normalization
//!
//! Paging input is best-effort navigation: out-of-range values are clamped,
//! never rejected.

/// Largest page size a caller can request
pub const MAX_PAGE_SIZE: i64 = 1000;

/// Effective page window after clamping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page number, always within `1..=total_pages`
    pub page: i64,

    /// Rows per page, always within `1..=MAX_PAGE_SIZE`
    pub page_size: i64,

    /// At least 1, even for an empty relation
    pub total_pages: i64,

    /// Number of rows to skip before the page starts
    pub offset: i64,
}

/// Normalize a requested page and page size against the relation's row count
///
/// - `page_size` is clamped to `[1, MAX_PAGE_SIZE]`
/// - `total_pages` is `max(1, ceil(total_rows / page_size))`
/// - `page` is clamped to `[1, total_pages]`
/// - `offset` is `(page - 1) * page_size`
pub fn paginate(requested_page: i64, requested_page_size: i64, total_rows: i64) -> Pagination {
    let page_size = requested_page_size.clamp(1, MAX_PAGE_SIZE);
    let total_rows = total_rows.max(0);

    let full_pages = total_rows / page_size;
    let partial_page = i64::from(total_rows % page_size != 0);
    let total_pages = (full_pages + partial_page).max(1);

    let page = requested_page.clamp(1, total_pages);

    Pagination {
        page,
        page_size,
        total_pages,
        offset: (page - 1) * page_size,
    }
}
