//! Relevance filters that only need listing-page data.

use crate::models::{FilterConfig, RawResultEntry};

/// Why a listing entry was dropped before any detail fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// A requirement tag carries the clearance marker value
    ClearanceTag,
    /// The title contains a clearance keyword
    ClearanceKeyword(String),
    /// The entry has no detail page to visit
    MissingDetailPath,
}

/// Screens out postings that require a security clearance.
#[derive(Debug, Clone)]
pub struct ClearanceFilter {
    tag: String,
    keywords: Vec<(String, String)>,
}

impl ClearanceFilter {
    pub fn new(config: &FilterConfig) -> Self {
        let keywords = config
            .clearance_keywords
            .iter()
            .filter(|k| !k.trim().is_empty())
            .map(|k| (k.clone(), k.to_lowercase()))
            .collect();
        Self {
            tag: config.clearance_tag.clone(),
            keywords,
        }
    }

    /// First clearance keyword found in `title`, ignoring case.
    pub fn matching_keyword(&self, title: &str) -> Option<&str> {
        let title = title.to_lowercase();
        self.keywords
            .iter()
            .find(|(_, lower)| title.contains(lower.as_str()))
            .map(|(keyword, _)| keyword.as_str())
    }

    /// Apply the tag check, then the title check.
    pub fn screen(&self, entry: &RawResultEntry) -> Option<Rejection> {
        if entry.has_tag_value(&self.tag) {
            return Some(Rejection::ClearanceTag);
        }
        self.matching_keyword(entry.title())
            .map(|keyword| Rejection::ClearanceKeyword(keyword.to_string()))
    }
}

impl Default for ClearanceFilter {
    fn default() -> Self {
        Self::new(&FilterConfig::default())
    }
}
