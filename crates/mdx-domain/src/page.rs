//! Pagination for list reads

/// Default number of items per page
pub const DEFAULT_LIMIT: u32 = 20;

/// Upper bound on items per page
pub const MAX_LIMIT: u32 = 200;

/// A bounded limit/offset pair
///
/// The limit is always within `[1, max]`, so a list read can never turn into
/// an unbounded scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    limit: u32,
    offset: u64,
}

impl Page {
    /// Create a page, clamping the limit to `[1, MAX_LIMIT]`
    ///
    /// # Examples
    ///
    /// ```
    /// use mdx_domain::Page;
    ///
    /// assert_eq!(Page::new(0, 0).limit(), 1);
    /// assert_eq!(Page::new(5000, 0).limit(), 200);
    /// ```
    pub fn new(limit: u32, offset: u64) -> Self {
        Self::bounded(limit, offset, MAX_LIMIT)
    }

    /// Create a page, clamping the limit to `[1, max_limit]`
    pub fn bounded(limit: u32, offset: u64, max_limit: u32) -> Self {
        Self {
            limit: limit.clamp(1, max_limit.max(1)),
            offset,
        }
    }

    /// Re-clamp an existing page to a tighter bound
    pub fn clamp_to(self, max_limit: u32) -> Self {
        Self::bounded(self.limit, self.offset, max_limit)
    }

    /// Items per page
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Items to skip
    pub fn offset(&self) -> u64 {
        self.offset
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT, 0)
    }
}
