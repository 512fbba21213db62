//! Pagination window helpers shared by every paginated listing.
//!
//! Trending, popular, discovery and search listings all bound page numbers
//! through these functions so edge cases are handled in one place.

use serde::{Deserialize, Serialize};

/// One page of a listing together with its pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultPage<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub total_pages: u32,
    pub total_results: u64,
}

impl<T> ResultPage<T> {
    /// Empty listing displayed as "page 1 of 1".
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            page: 1,
            total_pages: 1,
            total_results: 0,
        }
    }

    /// Applies the display floor and clamps `page` into range.
    pub fn normalized(mut self) -> Self {
        self.total_pages = floor_total_pages(self.total_pages);
        self.page = clamp_page(i64::from(self.page), self.total_pages);
        self
    }

    /// Keeps at most `limit` items, leaving pagination metadata untouched.
    pub fn truncated(mut self, limit: usize) -> Self {
        self.items.truncate(limit);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Default for ResultPage<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Bounds a requested page to `[1, total_pages]`.
///
/// `total_pages` of zero is treated as a single page, so the result is
/// always a displayable page number.
pub fn clamp_page(requested: i64, total_pages: u32) -> u32 {
    let upper = i64::from(floor_total_pages(total_pages));
    // upper fits in u32 by construction
    requested.clamp(1, upper) as u32
}

/// Ensures a page count is at least 1 ("page 1 of 1" for empty listings).
pub fn floor_total_pages(total_pages: u32) -> u32 {
    total_pages.max(1)
}

/// Number of fixed-size pages needed for `len` items, never less than 1.
pub fn total_pages_for(len: usize, page_size: usize) -> u32 {
    if page_size == 0 {
        return 1;
    }
    let pages = len.div_ceil(page_size).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Returns the 1-based `page` window of `items`.
///
/// Pages past the end yield an empty slice; callers clamp first.
pub fn page_window<T>(items: &[T], page: u32, page_size: usize) -> &[T] {
    let page = page.max(1) as usize;
    let start = (page - 1).saturating_mul(page_size).min(items.len());
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}
