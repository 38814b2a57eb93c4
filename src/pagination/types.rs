//! Pagination types and traits
//!
//! Defines the core pagination abstractions: the fetch capability, the
//! loop configuration, per-run state and the best-effort result.

use crate::error::{Error, Result};
use async_trait::async_trait;

/// Page size used when none is configured
pub const DEFAULT_PAGE_SIZE: u32 = 1000;

/// Result of processing one page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextPage {
    /// Page was full, fetch again from this offset
    Continue {
        /// Offset for the next request
        offset: u64,
    },
    /// Short page, the result set is exhausted
    Done,
}

impl NextPage {
    /// Check if this is a done result
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Check if this is a continue result
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue { .. })
    }
}

/// How the envelope's `success` field is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusPolicy {
    /// Accept any status, only records matter
    #[default]
    Ignore,
    /// Abort unless the envelope reports `"success"`
    RequireSuccess,
}

/// Configuration for the pagination loop
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// Records requested per page
    pub page_size: u32,
    /// Stop with an error after this many full pages (unbounded when `None`)
    pub max_pages: Option<u32>,
    /// Envelope status handling
    pub status_policy: StatusPolicy,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: None,
            status_policy: StatusPolicy::Ignore,
        }
    }
}

impl PaginationConfig {
    /// Create a config with the given page size
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size,
            ..Default::default()
        }
    }

    /// Set the page cap
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = Some(max_pages);
        self
    }

    /// Set the status policy
    #[must_use]
    pub fn with_status_policy(mut self, policy: StatusPolicy) -> Self {
        self.status_policy = policy;
        self
    }

    /// Reject settings the loop cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(Error::invalid_value(
                "page_size",
                "must be greater than zero",
            ));
        }
        if self.max_pages == Some(0) {
            return Err(Error::invalid_value(
                "max_pages",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// Tracks pagination state during iteration
#[derive(Debug, Clone, Default)]
pub struct PaginationState {
    /// Offset of the next request
    pub offset: u64,
    /// Pages processed so far
    pub pages: u32,
    /// Total records fetched so far
    pub total_fetched: u64,
    /// Is pagination complete?
    pub done: bool,
}

impl PaginationState {
    /// Create a new pagination state
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark pagination as complete
    pub fn mark_done(&mut self) {
        self.done = true;
    }

    /// Increment page counter
    pub fn next_page(&mut self) {
        self.pages += 1;
    }

    /// Add offset
    pub fn add_offset(&mut self, amount: u64) {
        self.offset += amount;
    }

    /// Add to total fetched
    pub fn add_fetched(&mut self, count: u64) {
        self.total_fetched += count;
    }
}

/// Capability to retrieve one raw page of results
///
/// Implemented by the HTTP client; tests supply scripted fetchers.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch up to `limit` records starting at `offset`, returning the raw body
    async fn fetch_page(&self, limit: u32, offset: u64) -> Result<Vec<u8>>;
}

/// Records gathered by a pagination run, with the error that stopped it
///
/// When `error` is set the records are a best-effort prefix of the full
/// result set, not the complete set.
#[derive(Debug)]
pub struct PaginatedRecords<T> {
    /// Records in the order they were received
    pub records: Vec<T>,
    /// First error encountered, if any
    pub error: Option<Error>,
}

impl<T> PaginatedRecords<T> {
    /// A run that reached a short page
    pub fn complete(records: Vec<T>) -> Self {
        Self {
            records,
            error: None,
        }
    }

    /// A run aborted by `error`
    pub fn partial(records: Vec<T>, error: Error) -> Self {
        Self {
            records,
            error: Some(error),
        }
    }

    /// True when no error stopped the run
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    /// Number of records gathered
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no records were gathered
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Split into records and the optional error
    pub fn into_parts(self) -> (Vec<T>, Option<Error>) {
        (self.records, self.error)
    }

    /// Discard partial records and keep only a complete set
    pub fn into_result(self) -> Result<Vec<T>> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.records),
        }
    }
}
