//! Pipeline entry points for crawler operations.
//!
//! - `run_crawler`: Walk the search results and write qualifying records
//! - `run_validate`: Check the configuration
//! - `run_show`: List the records of a previous run

pub mod crawl;
pub mod show;
pub mod validate;

pub use crawl::{CrawlParams, CrawlReport, authenticate, run_crawler};
pub use show::run_show;
pub use validate::run_validate;
