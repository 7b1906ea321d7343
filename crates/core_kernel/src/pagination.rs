//! Page parameters and page envelopes
//!
//! Out-of-range page requests are never errors: the page number is clamped to
//! at least 1 and the page size to `[1, MAX_PAGE_LIMIT]`.

use serde::{Deserialize, Serialize};

/// Largest page size a caller may request
pub const MAX_PAGE_LIMIT: u64 = 200;

/// Page size used when the caller does not ask for one
pub const DEFAULT_PAGE_LIMIT: u64 = 25;

/// A 1-based page request
///
/// Deserialized values pass through [`PageParams::new`], so they are clamped
/// the same way as constructed ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawPageParams")]
pub struct PageParams {
    page: u64,
    limit: u64,
}

/// Unchecked wire form of [`PageParams`]
#[derive(Deserialize)]
struct RawPageParams {
    #[serde(default = "default_page")]
    page: i64,
    #[serde(default = "default_limit")]
    limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    DEFAULT_PAGE_LIMIT as i64
}

impl From<RawPageParams> for PageParams {
    fn from(raw: RawPageParams) -> Self {
        PageParams::new(raw.page, raw.limit)
    }
}

impl PageParams {
    /// Creates page parameters, clamping both values into range
    ///
    /// # Arguments
    ///
    /// * `page` - Requested page number; anything below 1 becomes 1
    /// * `limit` - Requested page size; clamped to `[1, MAX_PAGE_LIMIT]`
    pub fn new(page: i64, limit: i64) -> Self {
        let page = page.max(1) as u64;
        let limit = limit.clamp(1, MAX_PAGE_LIMIT as i64) as u64;
        Self { page, limit }
    }

    /// The 1-based page number
    pub fn page(&self) -> u64 {
        self.page
    }

    /// The page size
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Number of rows preceding this page
    pub fn skip(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

/// Number of pages needed to show `total_count` rows, `limit` at a time
///
/// Never returns 0, so an empty result still reports "page 1 of 1".
pub fn total_pages(total_count: u64, limit: u64) -> u64 {
    let limit = limit.max(1);
    total_count.div_ceil(limit).max(1)
}

/// A window of rows together with the pagination metadata describing it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult<T> {
    /// Rows on this page
    pub data: Vec<T>,
    /// Number of rows matching the query across all pages
    pub total_count: u64,
    /// Echoed page number
    pub page: u64,
    /// Echoed page size
    pub limit: u64,
    /// `max(1, ceil(total_count / limit))`
    pub total_pages: u64,
}

impl<T> PageResult<T> {
    /// Assembles a page envelope
    pub fn new(data: Vec<T>, total_count: u64, params: PageParams) -> Self {
        Self {
            data,
            total_count,
            page: params.page(),
            limit: params.limit(),
            total_pages: total_pages(total_count, params.limit()),
        }
    }

    /// True when a later page exists
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}
