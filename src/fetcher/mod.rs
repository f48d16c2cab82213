//! The HTML fetching seam.
//!
//! The crawl core only needs two primitives from the outside world: fetch the
//! rendered HTML for a URL (optionally letting it settle for a few seconds)
//! and run a blocking manual sign-in that yields session cookies. Anything
//! that can do that, a plain HTTP client or a browser driver, implements
//! [`HtmlFetcher`].

mod http;
mod scripted;

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::{AppError, Result};

pub use http::{HttpFetcher, parse_cookie_header};
pub use scripted::{FetchCall, ScriptedFetcher};

/// Source of rendered page HTML.
#[async_trait]
pub trait HtmlFetcher: Send + Sync {
    /// Fetch the HTML for `url`, then wait `wait_secs` before returning.
    ///
    /// An `Err` means no content was obtained; callers treat it as a
    /// transient failure.
    async fn fetch_rendered(&self, url: &str, wait_secs: u64) -> Result<String>;

    /// Run a manual authentication flow for `url` and return the session
    /// cookies, keyed by cookie name.
    ///
    /// Blocks until the operator finishes.
    async fn fetch_authenticated(&self, url: &str) -> Result<HashMap<String, String>> {
        Err(AppError::auth(format!(
            "this fetcher cannot authenticate against {url}"
        )))
    }
}
