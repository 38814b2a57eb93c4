//! Pagination module
//!
//! Offset/limit pagination over the clients API.
//!
//! # Overview
//!
//! The paginator drives a [`PageFetcher`] one page at a time, decodes each
//! page envelope, and stops on the first page shorter than the requested
//! size. Failures end the run with the records gathered so far.

mod paginator;
mod types;

pub use paginator::OffsetPaginator;
pub use types::{
    NextPage, PageFetcher, PaginatedRecords, PaginationConfig, PaginationState, StatusPolicy,
    DEFAULT_PAGE_SIZE,
};
