// src/services/parser.rs

//! Listing and detail page parsing.
//!
//! Listing pages carry their results as a JSON object assigned to a script
//! variable; detail pages carry a linked-data (`application/ld+json`) block.
//! Neither parser fails: missing or malformed data maps to
//! [`SearchPageResult::Unparseable`] or an empty [`DetailData`].

use regex::Regex;
use scraper::{Html, Selector};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::{DetailData, RawResultEntry, SearchConfig, SearchPageResult};
use crate::utils::json::value_after_marker;

const LD_JSON_SELECTOR: &str = r#"script[type="application/ld+json"]"#;

/// Extracts structured data from fetched pages.
pub struct PageParser {
    marker: Regex,
    results_pointer: String,
    total_count_pointer: String,
    challenge_markers: Vec<String>,
    ld_json: Selector,
}

impl PageParser {
    /// Create a parser for the page layout described by `config`.
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let ld_json = Selector::parse(LD_JSON_SELECTOR)
            .map_err(|e| AppError::selector(LD_JSON_SELECTOR, format!("{e:?}")))?;

        Ok(Self {
            marker: Regex::new(&config.page_data_marker)?,
            results_pointer: config.results_pointer.clone(),
            total_count_pointer: config.total_count_pointer.clone(),
            challenge_markers: config
                .challenge_markers
                .iter()
                .filter(|m| !m.is_empty())
                .cloned()
                .collect(),
            ld_json,
        })
    }

    /// Whether `html` is an anti-bot interstitial.
    pub fn is_challenge(&self, html: &str) -> bool {
        self.challenge_markers.iter().any(|m| html.contains(m.as_str()))
    }

    /// Parse a listing page.
    pub fn parse(&self, html: &str) -> SearchPageResult {
        let Some(raw) = value_after_marker(html, &self.marker) else {
            if self.is_challenge(html) {
                return SearchPageResult::ChallengePage;
            }
            log::debug!("Listing page has no embedded page data");
            return SearchPageResult::Unparseable;
        };

        let data: Value = match serde_json::from_str(raw) {
            Ok(data) => data,
            Err(e) => {
                log::debug!("Embedded page data is not valid JSON: {}", e);
                return SearchPageResult::Unparseable;
            }
        };

        let Some(entries) = data.pointer(&self.results_pointer).and_then(Value::as_array) else {
            log::debug!("Page data has no results at {}", self.results_pointer);
            return SearchPageResult::Unparseable;
        };

        let results = entries.iter().map(decode_entry).collect();
        let total_count = data
            .pointer(&self.total_count_pointer)
            .and_then(count_from_value);

        SearchPageResult::Extracted {
            results,
            total_count,
        }
    }

    /// Extract the linked-data block of a detail page.
    pub fn extract_detail_json(&self, html: &str) -> DetailData {
        let document = Html::parse_document(html);

        let description = document
            .select(&self.ld_json)
            .filter_map(|script| {
                let text: String = script.text().collect();
                serde_json::from_str::<Value>(text.trim()).ok()
            })
            .find_map(|value| find_description(&value));

        DetailData { description }
    }
}

/// Decode one listing entry; an entry that does not fit the expected shape
/// becomes an empty entry so the page size stays accurate.
fn decode_entry(value: &Value) -> RawResultEntry {
    RawResultEntry::deserialize(value).unwrap_or_else(|e| {
        log::warn!("Malformed listing entry ignored: {}", e);
        RawResultEntry::default()
    })
}

fn count_from_value(value: &Value) -> Option<usize> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| usize::try_from(n).ok()),
        Value::String(s) => s.replace(',', "").trim().parse().ok(),
        _ => None,
    }
}

fn find_description(value: &Value) -> Option<String> {
    match value {
        Value::Object(fields) => {
            if let Some(Value::String(description)) = fields.get("description") {
                return Some(description.clone());
            }
            fields.get("@graph").and_then(find_description)
        }
        Value::Array(items) => items.iter().find_map(find_description),
        _ => None,
    }
}
