// src/services/paginator.rs

//! Pagination controller.
//!
//! Walks the offset-based listing one page at a time. Each call to
//! [`Paginator::step`] performs a single `Fetching -> Parsed -> ...`
//! transition and reports it as a [`PageOutcome`]; the loop in
//! [`Paginator::run`] only decides whether to keep going.
//!
//! Offset rules:
//! - a page with `N > 0` results advances the offset by `N`;
//! - an unparseable or challenge page advances it by 1;
//! - a URL already visited in this run is not fetched again and advances
//!   it by 1;
//! - a failed fetch leaves it unchanged (the next step then sees a visited
//!   URL);
//! - a page with zero results ends the crawl.

use std::collections::HashSet;
use std::time::Duration;

use futures::stream::{self, StreamExt};

use crate::error::{AppError, Result};
use crate::fetcher::HtmlFetcher;
use crate::models::{CrawlerConfig, JobRecord, RawResultEntry, SearchConfig, SearchPageResult};
use crate::services::extractor::{Extraction, RecordExtractor};
use crate::services::parser::PageParser;
use crate::storage::ResultStore;
use crate::utils::log::page_estimate;
use crate::utils::url::build_search_url;

/// Listing page size used only for progress narration.
const NOMINAL_PAGE_SIZE: usize = 25;

/// State of one crawl run.
#[derive(Debug)]
pub struct CrawlState {
    target_total: Option<usize>,
    offset: usize,
    visited: HashSet<String>,
    bad_pages: Vec<String>,
    store: ResultStore,
    pages_fetched: usize,
    rejected: usize,
    detail_failures: usize,
}

impl CrawlState {
    /// Start at `offset`; the target is discovered from the first parsed page
    /// when `target_total` is `None`.
    pub fn new(offset: usize, target_total: Option<usize>) -> Self {
        Self {
            target_total,
            offset,
            visited: HashSet::new(),
            bad_pages: Vec::new(),
            store: ResultStore::new(),
            pages_fetched: 0,
            rejected: 0,
            detail_failures: 0,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn target_total(&self) -> Option<usize> {
        self.target_total
    }

    pub fn bad_pages(&self) -> &[String] {
        &self.bad_pages
    }

    pub fn records(&self) -> &[JobRecord] {
        self.store.records()
    }

    pub fn has_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// Mark `url` visited; `false` if it already was.
    fn visit(&mut self, url: &str) -> bool {
        self.visited.insert(url.to_string())
    }

    fn advance(&mut self, by: usize) {
        self.offset += by;
    }

    /// Set the target once; later pages never change it.
    fn discover_target(&mut self, total_count: Option<usize>, fallback: usize) {
        if self.target_total.is_some() {
            return;
        }
        let target = total_count.unwrap_or_else(|| {
            log::warn!(
                "Total job count missing from page metadata, using fallback of {}",
                fallback
            );
            fallback
        });
        self.target_total = Some(target);
    }

    fn record_bad_page(&mut self, url: String) {
        self.bad_pages.push(url);
    }

    fn finish(self, status: CrawlStatus) -> CrawlOutcome {
        CrawlOutcome {
            status,
            final_offset: self.offset,
            target_total: self.target_total.unwrap_or_default(),
            bad_pages: self.bad_pages,
            pages_fetched: self.pages_fetched,
            rejected: self.rejected,
            detail_failures: self.detail_failures,
            records: self.store.into_records(),
        }
    }
}

/// Result of one controller step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// Page had results; offset moved by the observed page size
    Advanced { page_size: usize, extracted: usize },
    /// URL was already visited; not fetched
    DuplicateSkipped,
    /// Fetcher returned no content; offset unchanged
    FetchFailed,
    /// Page stayed an interstitial after one retry
    ChallengeEncountered,
    /// Embedded page data missing or malformed
    Unparseable,
    /// Page had zero results
    Terminated,
}

/// How a crawl ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlStatus {
    /// Offset reached the target job count
    Exhausted,
    /// A page came back with zero results
    Terminated,
}

/// Summary of a crawl run.
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    pub status: CrawlStatus,
    pub records: Vec<JobRecord>,
    pub bad_pages: Vec<String>,
    pub final_offset: usize,
    pub target_total: usize,
    pub pages_fetched: usize,
    pub rejected: usize,
    pub detail_failures: usize,
}

/// Drives fetch, parse and extract across listing offsets.
pub struct Paginator<'a> {
    fetcher: &'a dyn HtmlFetcher,
    parser: &'a PageParser,
    extractor: RecordExtractor<'a>,
    search: &'a SearchConfig,
    page_wait_secs: u64,
    request_delay: Duration,
    max_concurrent: usize,
}

impl<'a> Paginator<'a> {
    pub fn new(
        fetcher: &'a dyn HtmlFetcher,
        parser: &'a PageParser,
        extractor: RecordExtractor<'a>,
        search: &'a SearchConfig,
        crawler: &CrawlerConfig,
    ) -> Self {
        Self {
            fetcher,
            parser,
            extractor,
            search,
            page_wait_secs: crawler.page_wait_secs,
            request_delay: Duration::from_millis(crawler.request_delay_ms),
            max_concurrent: crawler.max_concurrent.max(1),
        }
    }

    /// Override the settle delay used for listing pages.
    pub fn with_page_wait(mut self, secs: u64) -> Self {
        self.page_wait_secs = secs;
        self
    }

    /// Listing URL for `offset`.
    pub fn page_url(&self, query: &str, location: &str, offset: usize) -> Result<String> {
        build_search_url(&self.search.base_url, query, location, offset)
    }

    /// Crawl from offset 0, discovering the target from the first page.
    ///
    /// Fails only when the first page yields no content at all.
    pub async fn crawl(&self, query: &str, location: &str) -> Result<CrawlOutcome> {
        let mut state = CrawlState::new(0, None);

        match self.step(&mut state, query, location).await? {
            PageOutcome::FetchFailed => {
                let url = self.page_url(query, location, 0)?;
                return Err(AppError::crawl(url, "no content for the first page"));
            }
            PageOutcome::Terminated => {
                log::info!("No jobs found for '{}' in '{}'", query, location);
                return Ok(state.finish(CrawlStatus::Terminated));
            }
            _ => {}
        }
        state.discover_target(None, self.search.fallback_total);

        log::info!(
            "Total jobs to scrape: {}",
            state.target_total.unwrap_or_default()
        );
        self.drive(state, query, location).await
    }

    /// Crawl from `initial_offset` until `target_total` is reached or a page
    /// comes back empty.
    pub async fn run(
        &self,
        query: &str,
        location: &str,
        initial_offset: usize,
        target_total: usize,
    ) -> Result<CrawlOutcome> {
        let state = CrawlState::new(initial_offset, Some(target_total));
        self.drive(state, query, location).await
    }

    async fn drive(&self, mut state: CrawlState, query: &str, location: &str) -> Result<CrawlOutcome> {
        let mut page = 1;

        while state.offset < state.target_total.unwrap_or(self.search.fallback_total) {
            let total = state.target_total.unwrap_or(self.search.fallback_total);
            log::info!(
                "Turning the page {} of {} (offset {})",
                page,
                page_estimate(total, NOMINAL_PAGE_SIZE),
                state.offset
            );
            page += 1;

            let outcome = self.step(&mut state, query, location).await?;
            if outcome == PageOutcome::Terminated {
                log::info!(
                    "No more jobs found at offset {}. Records so far: {}",
                    state.offset,
                    state.store.len()
                );
                return Ok(state.finish(CrawlStatus::Terminated));
            }

            if !self.request_delay.is_zero() && outcome != PageOutcome::DuplicateSkipped {
                tokio::time::sleep(self.request_delay).await;
            }
        }

        Ok(state.finish(CrawlStatus::Exhausted))
    }

    /// Perform one transition at the current offset.
    ///
    /// Only a URL that cannot be built is an error.
    pub async fn step(
        &self,
        state: &mut CrawlState,
        query: &str,
        location: &str,
    ) -> Result<PageOutcome> {
        let url = self.page_url(query, location, state.offset)?;

        if !state.visit(&url) {
            log::debug!("Already visited {}, moving on", url);
            state.advance(1);
            return Ok(PageOutcome::DuplicateSkipped);
        }

        state.pages_fetched += 1;
        let html = match self.fetcher.fetch_rendered(&url, self.page_wait_secs).await {
            Ok(html) => html,
            Err(e) => {
                log::warn!("Failed to retrieve HTML for {}: {}", url, e);
                return Ok(PageOutcome::FetchFailed);
            }
        };

        let mut page = self.parser.parse(&html);
        if page == SearchPageResult::ChallengePage {
            log::info!("Challenge page at {}, trying again", url);
            page = match self.fetcher.fetch_rendered(&url, 0).await {
                Ok(html) => self.parser.parse(&html),
                Err(e) => {
                    log::warn!("Retry failed for {}: {}", url, e);
                    SearchPageResult::ChallengePage
                }
            };
        }

        log::debug!("Page {} status: {:?}", url, page.status());
        match page {
            SearchPageResult::ChallengePage => {
                log::error!("Challenge page persisted: {}", url);
                state.record_bad_page(url);
                state.advance(1);
                Ok(PageOutcome::ChallengeEncountered)
            }
            SearchPageResult::Unparseable => {
                log::error!("Error on the HTML: {}", url);
                state.record_bad_page(url);
                state.advance(1);
                Ok(PageOutcome::Unparseable)
            }
            SearchPageResult::Extracted {
                results,
                total_count,
            } => {
                state.discover_target(total_count, self.search.fallback_total);
                if results.is_empty() {
                    return Ok(PageOutcome::Terminated);
                }

                let extracted = self.extract_page(state, &results).await;
                state.advance(results.len());
                Ok(PageOutcome::Advanced {
                    page_size: results.len(),
                    extracted,
                })
            }
        }
    }

    /// Run the extractor over a page's entries and store the records in
    /// listing order. Detail pages are fetched up to `max_concurrent` at a
    /// time.
    async fn extract_page(&self, state: &mut CrawlState, results: &[RawResultEntry]) -> usize {
        let extractions: Vec<Extraction> = stream::iter(results)
            .map(|entry| self.extractor.process(entry))
            .buffered(self.max_concurrent)
            .collect()
            .await;

        let mut extracted = 0;
        for extraction in extractions {
            match extraction {
                Extraction::Record(record) => {
                    log::debug!("Getting the job {}", record.name);
                    if state.store.push(record) {
                        extracted += 1;
                    }
                }
                Extraction::Rejected(_) => state.rejected += 1,
                Extraction::FetchFailed { .. } => state.detail_failures += 1,
            }
        }
        extracted
    }
}
