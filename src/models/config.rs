//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP and fetching behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Upstream search endpoint and page-data layout
    #[serde(default)]
    pub search: SearchConfig,

    /// Relevance filters applied to listing entries
    #[serde(default)]
    pub filter: FilterConfig,

    /// Where extracted records are written
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        if self.crawler.max_concurrent == 0 {
            return Err(AppError::validation("crawler.max_concurrent must be > 0"));
        }
        url::Url::parse(&self.search.base_url)
            .map_err(|e| AppError::validation(format!("search.base_url: {e}")))?;
        url::Url::parse(&self.search.site_root)
            .map_err(|e| AppError::validation(format!("search.site_root: {e}")))?;
        regex::Regex::new(&self.search.page_data_marker)
            .map_err(|e| AppError::validation(format!("search.page_data_marker: {e}")))?;
        if self.search.fallback_total == 0 {
            return Err(AppError::validation("search.fallback_total must be > 0"));
        }
        for (name, pointer) in [
            ("search.results_pointer", &self.search.results_pointer),
            ("search.total_count_pointer", &self.search.total_count_pointer),
        ] {
            if !pointer.is_empty() && !pointer.starts_with('/') {
                return Err(AppError::validation(format!(
                    "{name} must be a JSON pointer starting with '/'"
                )));
            }
        }
        if self.search.challenge_markers.iter().all(|m| m.trim().is_empty()) {
            return Err(AppError::validation("No challenge markers defined"));
        }
        if self.filter.clearance_tag.trim().is_empty() {
            return Err(AppError::validation("filter.clearance_tag is empty"));
        }
        if self.output.dir.trim().is_empty() {
            return Err(AppError::validation("output.dir is empty"));
        }
        Ok(())
    }
}

/// HTTP client and fetching behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Accept-Language header for HTTP requests
    #[serde(default = "defaults::accept_language")]
    pub accept_language: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Settle delay after loading a listing page
    #[serde(default = "defaults::page_wait")]
    pub page_wait_secs: u64,

    /// Settle delay after loading a detail page
    #[serde(default = "defaults::detail_wait")]
    pub detail_wait_secs: u64,

    /// Delay between listing pages in milliseconds
    #[serde(default)]
    pub request_delay_ms: u64,

    /// Detail pages fetched in parallel for one listing page
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            accept_language: defaults::accept_language(),
            timeout_secs: defaults::timeout(),
            page_wait_secs: defaults::page_wait(),
            detail_wait_secs: defaults::detail_wait(),
            request_delay_ms: 0,
            max_concurrent: defaults::max_concurrent(),
        }
    }
}

/// Upstream search endpoint and the shape of its embedded page data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Listing endpoint; query, location and offset are appended as parameters
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Prefix joined with an entry's detail path to form its canonical link
    #[serde(default = "defaults::site_root")]
    pub site_root: String,

    #[serde(default = "defaults::query")]
    pub default_query: String,

    #[serde(default = "defaults::location")]
    pub default_location: String,

    /// Target job count used when the first page carries no count
    #[serde(default = "defaults::fallback_total")]
    pub fallback_total: usize,

    /// Regex matching the script assignment that precedes the page data object
    #[serde(default = "defaults::page_data_marker")]
    pub page_data_marker: String,

    /// JSON pointer to the results array inside the page data
    #[serde(default = "defaults::results_pointer")]
    pub results_pointer: String,

    /// JSON pointer to the total job count inside the page data
    #[serde(default = "defaults::total_count_pointer")]
    pub total_count_pointer: String,

    /// Substrings identifying an anti-bot interstitial
    #[serde(default = "defaults::challenge_markers")]
    pub challenge_markers: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            site_root: defaults::site_root(),
            default_query: defaults::query(),
            default_location: defaults::location(),
            fallback_total: defaults::fallback_total(),
            page_data_marker: defaults::page_data_marker(),
            results_pointer: defaults::results_pointer(),
            total_count_pointer: defaults::total_count_pointer(),
            challenge_markers: defaults::challenge_markers(),
        }
    }
}

/// Relevance filter settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Requirement tag value that rejects an entry outright
    #[serde(default = "defaults::clearance_tag")]
    pub clearance_tag: String,

    /// Title substrings (case-insensitive) that reject an entry
    #[serde(default = "defaults::clearance_keywords")]
    pub clearance_keywords: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            clearance_tag: defaults::clearance_tag(),
            clearance_keywords: defaults::clearance_keywords(),
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving one JSON file per run
    #[serde(default = "defaults::output_dir")]
    pub dir: String,

    #[serde(default = "defaults::pretty")]
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: defaults::output_dir(),
            pretty: defaults::pretty(),
        }
    }
}

mod defaults {
    // Crawler defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36".into()
    }
    pub fn accept_language() -> String {
        "en-US,en;q=0.9".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn page_wait() -> u64 {
        5
    }
    pub fn detail_wait() -> u64 {
        5
    }
    pub fn max_concurrent() -> usize {
        1
    }

    // Search defaults
    pub fn base_url() -> String {
        "https://indeed.com/jobs".into()
    }
    pub fn site_root() -> String {
        "https://indeed.com".into()
    }
    pub fn query() -> String {
        "security analyst".into()
    }
    pub fn location() -> String {
        "remote".into()
    }
    pub fn fallback_total() -> usize {
        500
    }
    pub fn page_data_marker() -> String {
        r#"window\.mosaic\.providerData\["mosaic-provider-jobcards"\]\s*="#.into()
    }
    pub fn results_pointer() -> String {
        "/metaData/mosaicProviderJobCardsModel/results".into()
    }
    pub fn total_count_pointer() -> String {
        "/metaData/mosaicProviderJobCardsModel/tierSummaries/0/jobCount".into()
    }
    pub fn challenge_markers() -> Vec<String> {
        vec!["<title>Just a moment...</title>".into()]
    }

    // Filter defaults
    pub fn clearance_tag() -> String {
        "Security clearance".into()
    }
    pub fn clearance_keywords() -> Vec<String> {
        [
            "Secret",
            "Top Secret",
            "TS/SCI",
            "SCI",
            "Confidential",
            "Public Trust",
            "Sensitive Compartmented Information",
            "Yankee White",
            "Interim Secret",
            "Interim Top Secret",
            "Q Clearance",
            "L Clearance",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }

    // Output defaults
    pub fn output_dir() -> String {
        "searches".into()
    }
    pub fn pretty() -> bool {
        true
    }
}
