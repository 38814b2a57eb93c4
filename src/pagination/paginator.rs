//! Offset paginator
//!
//! Requests pages with a `limit`/`offset` cursor until the server returns
//! a page with fewer records than requested.

use super::types::{
    NextPage, PageFetcher, PaginatedRecords, PaginationConfig, PaginationState, StatusPolicy,
};
use crate::error::{Error, Result};
use crate::schema::{EndpointRecord, PageResponse};
use tracing::{debug, info, warn};

/// Offset-based paginator over the clients API
///
/// The offset advances by the number of records actually returned, never by
/// the requested limit. A short page (including an empty one) is the only
/// exhaustion signal.
#[derive(Debug, Clone, Default)]
pub struct OffsetPaginator {
    config: PaginationConfig,
}

impl OffsetPaginator {
    /// Create a paginator with the given configuration
    pub fn new(config: PaginationConfig) -> Self {
        Self { config }
    }

    /// Create a paginator with default settings and the given page size
    pub fn with_page_size(page_size: u32) -> Self {
        Self::new(PaginationConfig::new(page_size))
    }

    /// Active configuration
    pub fn config(&self) -> &PaginationConfig {
        &self.config
    }

    /// Limit and offset for the next request
    pub fn request_params(&self, state: &PaginationState) -> (u32, u64) {
        (self.config.page_size, state.offset)
    }

    /// Fold one page's record count into `state` and decide what comes next
    ///
    /// Fails with [`Error::MaxPagesExceeded`] when a full page arrives after
    /// the configured cap has been reached.
    pub fn process_page(
        &self,
        records_count: usize,
        state: &mut PaginationState,
    ) -> Result<NextPage> {
        state.add_fetched(records_count as u64);
        state.next_page();
        state.add_offset(records_count as u64);

        if records_count < self.config.page_size as usize {
            state.mark_done();
            return Ok(NextPage::Done);
        }

        if let Some(max_pages) = self.config.max_pages {
            if state.pages >= max_pages {
                return Err(Error::MaxPagesExceeded { max_pages });
            }
        }

        Ok(NextPage::Continue {
            offset: state.offset,
        })
    }

    /// Fetch every page and return the accumulated records
    ///
    /// Any fetch or decode failure stops the loop immediately; the records
    /// gathered before it are returned alongside the error.
    pub async fn fetch_all<F>(&self, fetcher: &F) -> PaginatedRecords<EndpointRecord>
    where
        F: PageFetcher + ?Sized,
    {
        let mut records = Vec::new();

        if let Err(e) = self.config.validate() {
            return PaginatedRecords::partial(records, e);
        }

        let mut state = PaginationState::new();
        loop {
            let (limit, offset) = self.request_params(&state);
            debug!("Fetching page {} (limit={limit}, offset={offset})", state.pages + 1);

            let page = match self.load_page(fetcher, limit, offset).await {
                Ok(page) => page,
                Err(e) => {
                    warn!(
                        "Pagination aborted at offset {offset} after {} records: {e}",
                        records.len()
                    );
                    return PaginatedRecords::partial(records, e);
                }
            };

            let count = page.records.len();
            records.extend(page.records);

            match self.process_page(count, &mut state) {
                Ok(NextPage::Done) => break,
                Ok(NextPage::Continue { .. }) => {}
                Err(e) => {
                    warn!("Pagination stopped after {} pages: {e}", state.pages);
                    return PaginatedRecords::partial(records, e);
                }
            }
        }

        info!(
            "Fetched {} records in {} pages",
            state.total_fetched, state.pages
        );
        PaginatedRecords::complete(records)
    }

    async fn load_page<F>(&self, fetcher: &F, limit: u32, offset: u64) -> Result<PageResponse>
    where
        F: PageFetcher + ?Sized,
    {
        let body = fetcher.fetch_page(limit, offset).await?;
        let page = PageResponse::from_slice(&body)?;

        if self.config.status_policy == StatusPolicy::RequireSuccess && !page.is_success() {
            return Err(Error::RequestFailed {
                status: page.status.unwrap_or_default(),
                message: page.message.unwrap_or_default(),
            });
        }

        debug!("Decoded {} records at offset {offset}", page.len());
        Ok(page)
    }
}
