//! Maps the page based query parameters of the list endpoints onto row
//! offsets for the stores.

/// A validated pair of list paging parameters.
///
/// The public API is page based: clients send a page number (one indexed) and
/// a page size, and the store sees a row offset. Page zero is treated as page
/// one so that omitting the parameter fetches the first page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    limit: u64,
    offset: u64,
}

impl Page {
    /// Create a page from the raw `limit` and `offset` (page number) query
    /// parameters.
    ///
    /// Returns `None` when `limit` is not positive, the page number is
    /// negative, or the row offset would overflow.
    pub fn new(limit: i64, page_number: i64) -> Option<Self> {
        if limit <= 0 || page_number < 0 {
            return None;
        }

        let limit = limit as u64;
        let offset = ((page_number as u64).max(1) - 1).checked_mul(limit)?;

        Some(Self { limit, offset })
    }

    /// The maximum number of rows on the page.
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// The number of rows to skip to reach the start of the page.
    pub fn row_offset(&self) -> u64 {
        self.offset
    }
}
