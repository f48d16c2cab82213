//! Service layer for the job crawler.
//!
//! This module contains the business logic for:
//! - Page parsing (`PageParser`)
//! - Clearance screening (`ClearanceFilter`)
//! - Record extraction (`RecordExtractor`)
//! - Pagination (`Paginator`)

mod extractor;
mod filters;
mod paginator;
mod parser;

pub use extractor::{Extraction, NO_DESCRIPTION, RecordExtractor};
pub use filters::{ClearanceFilter, Rejection};
pub use paginator::{CrawlOutcome, CrawlState, CrawlStatus, PageOutcome, Paginator};
pub use parser::PageParser;
