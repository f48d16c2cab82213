//! In-memory fetcher that replays canned pages.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::HtmlFetcher;
use crate::error::{AppError, Result};

/// One recorded `fetch_rendered` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchCall {
    pub url: String,
    pub wait_secs: u64,
}

/// Replays scripted responses per URL and records every call.
///
/// Responses for a URL are served in order; the last one keeps being served
/// once the queue is down to it. URLs with no script fail.
#[derive(Default)]
pub struct ScriptedFetcher {
    responses: Mutex<HashMap<String, VecDeque<Option<String>>>>,
    calls: Mutex<Vec<FetchCall>>,
    session: HashMap<String, String>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response for `url`.
    pub fn respond(self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.push(url.into(), Some(html.into()));
        self
    }

    /// Queue a failed fetch for `url`.
    pub fn fail(self, url: impl Into<String>) -> Self {
        self.push(url.into(), None);
        self
    }

    /// Cookies returned by `fetch_authenticated`.
    pub fn with_session(mut self, cookies: HashMap<String, String>) -> Self {
        self.session = cookies;
        self
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<FetchCall> {
        lock(&self.calls).clone()
    }

    /// How many times `url` was fetched.
    pub fn fetch_count(&self, url: &str) -> usize {
        lock(&self.calls).iter().filter(|c| c.url == url).count()
    }

    fn push(&self, url: String, response: Option<String>) {
        lock(&self.responses)
            .entry(url)
            .or_default()
            .push_back(response);
    }

    fn next_response(&self, url: &str) -> Option<Option<String>> {
        let mut responses = lock(&self.responses);
        let queue = responses.get_mut(url)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl HtmlFetcher for ScriptedFetcher {
    async fn fetch_rendered(&self, url: &str, wait_secs: u64) -> Result<String> {
        lock(&self.calls).push(FetchCall {
            url: url.to_string(),
            wait_secs,
        });
        match self.next_response(url) {
            Some(Some(html)) => Ok(html),
            Some(None) => Err(AppError::fetch(url, "scripted failure")),
            None => Err(AppError::fetch(url, "no scripted response")),
        }
    }

    async fn fetch_authenticated(&self, url: &str) -> Result<HashMap<String, String>> {
        if self.session.is_empty() {
            return Err(AppError::auth(format!("no session scripted for {url}")));
        }
        Ok(self.session.clone())
    }
}
