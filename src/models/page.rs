//! Outcomes of parsing listing and detail pages.

use super::RawResultEntry;

/// Result of parsing one listing page.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchPageResult {
    /// The embedded page data was found and decoded.
    Extracted {
        results: Vec<RawResultEntry>,
        /// `None` when the count path does not resolve
        total_count: Option<usize>,
    },
    /// The page is an anti-bot interstitial.
    ChallengePage,
    /// The embedded page data is absent or malformed.
    Unparseable,
}

impl SearchPageResult {
    pub fn status(&self) -> PageStatus {
        match self {
            Self::Extracted { .. } => PageStatus::Ok,
            Self::ChallengePage => PageStatus::ChallengePage,
            Self::Unparseable => PageStatus::Unparseable,
        }
    }
}

/// Extraction status of a fetched page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStatus {
    Ok,
    ChallengePage,
    Unparseable,
}

/// Linked data read from a job detail page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailData {
    /// Raw description markup, `None` when the block or field is missing
    pub description: Option<String>,
}
