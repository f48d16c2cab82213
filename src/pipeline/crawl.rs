// src/pipeline/crawl.rs

//! Job crawling pipeline.

use std::collections::HashMap;
use std::time::Instant;

use crate::error::Result;
use crate::fetcher::HtmlFetcher;
use crate::models::Config;
use crate::services::{ClearanceFilter, CrawlOutcome, PageParser, Paginator, RecordExtractor};
use crate::storage::RecordStorage;
use crate::utils::log::{header, step, sub_item, success, summary};
use crate::utils::url::build_search_url;

/// Run parameters supplied by the command line.
#[derive(Debug, Clone)]
pub struct CrawlParams {
    pub query: String,
    pub location: String,
    /// Listing page settle delay; the configured value when `None`
    pub wait_secs: Option<u64>,
}

impl CrawlParams {
    /// Parameters falling back to the configured query and location.
    pub fn from_config(config: &Config) -> Self {
        Self {
            query: config.search.default_query.clone(),
            location: config.search.default_location.clone(),
            wait_secs: None,
        }
    }
}

/// What a finished run produced.
#[derive(Debug)]
pub struct CrawlReport {
    pub outcome: CrawlOutcome,
    /// Where the records were written; `None` when nothing qualified
    pub output: Option<String>,
}

/// Run the manual sign-in flow for the search page of `params`.
pub async fn authenticate(
    config: &Config,
    fetcher: &dyn HtmlFetcher,
    params: &CrawlParams,
) -> Result<HashMap<String, String>> {
    let url = url::Url::parse_with_params(
        &config.search.base_url,
        &[("q", params.query.as_str()), ("l", params.location.as_str())],
    )?;
    log::info!("Authenticating to the website...");
    let cookies = fetcher.fetch_authenticated(url.as_str()).await?;
    log::info!(
        "Authentication cookies retrieved: {}",
        cookies.keys().cloned().collect::<Vec<_>>().join(", ")
    );
    Ok(cookies)
}

/// Run the crawler and persist whatever qualified.
pub async fn run_crawler(
    config: &Config,
    fetcher: &dyn HtmlFetcher,
    storage: &dyn RecordStorage,
    params: &CrawlParams,
) -> Result<CrawlReport> {
    let started = Instant::now();
    header("Job crawler starting");

    let parser = PageParser::new(&config.search)?;
    let filter = ClearanceFilter::new(&config.filter);
    let extractor = RecordExtractor::new(
        fetcher,
        &parser,
        &filter,
        config.search.site_root.clone(),
        config.crawler.detail_wait_secs,
    );
    let mut paginator = Paginator::new(fetcher, &parser, extractor, &config.search, &config.crawler);
    if let Some(wait) = params.wait_secs {
        paginator = paginator.with_page_wait(wait);
    }

    step(1, 3, "Crawling search results");
    let first = build_search_url(&config.search.base_url, &params.query, &params.location, 0)?;
    log::info!("Scraping {}", first);

    let outcome = match paginator.crawl(&params.query, &params.location).await {
        Ok(outcome) => outcome,
        Err(e) => {
            log::error!("Scraping failed: {}", e);
            return Err(e);
        }
    };

    step(2, 3, "Reporting");
    for url in &outcome.bad_pages {
        log::error!("Unknown error for: {}", url);
    }

    summary(
        "Crawl finished",
        &[
            ("Status", format!("{:?}", outcome.status)),
            ("Target jobs", outcome.target_total.to_string()),
            ("Final offset", outcome.final_offset.to_string()),
            ("Listing pages fetched", outcome.pages_fetched.to_string()),
            ("Records", outcome.records.len().to_string()),
            ("Filtered out", outcome.rejected.to_string()),
            ("Detail fetch failures", outcome.detail_failures.to_string()),
            ("Unparseable pages", outcome.bad_pages.len().to_string()),
            ("Elapsed", format!("{:.1}s", started.elapsed().as_secs_f64())),
        ],
    );

    step(3, 3, "Saving records");
    if outcome.records.is_empty() {
        log::info!("No roles extracted.");
        return Ok(CrawlReport {
            outcome,
            output: None,
        });
    }

    let location = storage.write_records(&params.query, &outcome.records).await?;
    success(&format!("Wrote {} roles", outcome.records.len()));
    sub_item(&location);

    Ok(CrawlReport {
        outcome,
        output: Some(location),
    })
}
