// src/fetcher/http.rs

//! `reqwest`-backed fetcher.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, COOKIE, HeaderMap, HeaderValue};

use super::HtmlFetcher;
use crate::error::{AppError, Result};
use crate::models::CrawlerConfig;

/// Fetches pages over plain HTTP with browser-like headers.
pub struct HttpFetcher {
    client: Client,
    cookies: HashMap<String, String>,
}

impl HttpFetcher {
    /// Create a fetcher from the crawler settings.
    pub fn new(config: &CrawlerConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,*/*;q=0.8"),
        );
        let language = HeaderValue::from_str(&config.accept_language)
            .map_err(|e| AppError::config(format!("crawler.accept_language: {e}")))?;
        headers.insert(ACCEPT_LANGUAGE, language);

        let client = Client::builder()
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            cookies: HashMap::new(),
        })
    }

    /// Send these session cookies with every request.
    pub fn with_cookies(mut self, cookies: HashMap<String, String>) -> Self {
        self.cookies.extend(cookies);
        self
    }

    fn cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        let mut pairs: Vec<_> = self
            .cookies
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        pairs.sort();
        Some(pairs.join("; "))
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        let mut request = self.client.get(url);
        if let Some(cookie) = self.cookie_header() {
            request = request.header(COOKIE, cookie);
        }
        let response = request.send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}

#[async_trait]
impl HtmlFetcher for HttpFetcher {
    async fn fetch_rendered(&self, url: &str, wait_secs: u64) -> Result<String> {
        let html = self.get_text(url).await?;
        if wait_secs > 0 {
            tokio::time::sleep(Duration::from_secs(wait_secs)).await;
        }
        if html.trim().is_empty() {
            return Err(AppError::fetch(url, "empty response body"));
        }
        Ok(html)
    }

    async fn fetch_authenticated(&self, url: &str) -> Result<HashMap<String, String>> {
        log::info!("Open {} in your browser and sign in.", url);
        log::info!("Then paste the request's Cookie header value here and press Enter:");

        let line = tokio::task::spawn_blocking(|| {
            let mut line = String::new();
            std::io::stdin().read_line(&mut line).map(|_| line)
        })
        .await
        .map_err(|e| AppError::auth(format!("input task failed: {e}")))??;

        let cookies = parse_cookie_header(&line);
        if cookies.is_empty() {
            return Err(AppError::auth("no cookies were provided"));
        }
        log::info!("Captured {} session cookies", cookies.len());
        Ok(cookies)
    }
}

/// Parse a `name=value; name2=value2` cookie string.
///
/// A leading `Cookie:` label is tolerated; pairs without `=` are skipped.
pub fn parse_cookie_header(raw: &str) -> HashMap<String, String> {
    let raw = raw.trim();
    let raw = raw
        .strip_prefix("Cookie:")
        .or_else(|| raw.strip_prefix("cookie:"))
        .unwrap_or(raw);

    raw.split(';')
        .filter_map(|pair| {
            let (name, value) = pair.split_once('=')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some((name.to_string(), value.trim().to_string()))
        })
        .collect()
}
