// src/services/extractor.rs

//! Turns listing entries into job records.

use crate::fetcher::HtmlFetcher;
use crate::models::{JobRecord, RawResultEntry};
use crate::services::filters::{ClearanceFilter, Rejection};
use crate::services::parser::PageParser;
use crate::utils::text::html_to_text;
use crate::utils::url::detail_url;

/// Description used when a detail page has no linked-data description.
pub const NO_DESCRIPTION: &str = "No description";

/// What happened to one listing entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Record(JobRecord),
    Rejected(Rejection),
    /// The detail page could not be fetched; the entry is skipped
    FetchFailed { url: String },
}

impl Extraction {
    pub fn into_record(self) -> Option<JobRecord> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }
}

/// Filters listing entries and enriches survivors from their detail page.
pub struct RecordExtractor<'a> {
    fetcher: &'a dyn HtmlFetcher,
    parser: &'a PageParser,
    filter: &'a ClearanceFilter,
    site_root: String,
    detail_wait_secs: u64,
}

impl<'a> RecordExtractor<'a> {
    pub fn new(
        fetcher: &'a dyn HtmlFetcher,
        parser: &'a PageParser,
        filter: &'a ClearanceFilter,
        site_root: impl Into<String>,
        detail_wait_secs: u64,
    ) -> Self {
        Self {
            fetcher,
            parser,
            filter,
            site_root: site_root.into(),
            detail_wait_secs,
        }
    }

    /// Extract a record, or `None` if the entry is filtered out or its
    /// detail page is unavailable.
    pub async fn extract(&self, entry: &RawResultEntry) -> Option<JobRecord> {
        self.process(entry).await.into_record()
    }

    /// Run the filters in order and, if the entry survives, fetch its detail
    /// page and assemble the record.
    pub async fn process(&self, entry: &RawResultEntry) -> Extraction {
        if let Some(rejection) = self.filter.screen(entry) {
            log::debug!("Skipping '{}': {:?}", entry.title(), rejection);
            return Extraction::Rejected(rejection);
        }
        if entry.detail_path().trim().is_empty() {
            log::warn!("Skipping '{}': no detail page path", entry.title());
            return Extraction::Rejected(Rejection::MissingDetailPath);
        }

        let url = detail_url(&self.site_root, entry.detail_path());
        log::debug!("Getting the job page {}", url);

        let Some(html) = self.fetch_detail(&url).await else {
            return Extraction::FetchFailed { url };
        };

        let description = self
            .parser
            .extract_detail_json(&html)
            .description
            .map(|markup| html_to_text(&markup))
            .unwrap_or_else(|| NO_DESCRIPTION.to_string());

        Extraction::Record(JobRecord {
            name: entry.title().to_string(),
            company: entry.company().to_string(),
            description,
            salary: entry.salary_range().to_string(),
            remote: entry.remote_text().to_string(),
            requirements: entry.requirement_labels(),
            city: entry.city().to_string(),
            state: entry.state().to_string(),
            link: url,
        })
    }

    /// Fetch a detail page, retrying once without waiting when the first
    /// response is a challenge interstitial.
    async fn fetch_detail(&self, url: &str) -> Option<String> {
        let html = match self.fetcher.fetch_rendered(url, self.detail_wait_secs).await {
            Ok(html) => html,
            Err(e) => {
                log::warn!("Failed to fetch job page: {}", e);
                return None;
            }
        };
        if !self.parser.is_challenge(&html) {
            return Some(html);
        }

        log::info!("Challenge page at {}, trying again", url);
        match self.fetcher.fetch_rendered(url, 0).await {
            Ok(html) => Some(html),
            Err(e) => {
                log::warn!("Retry failed for job page: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::fetcher::ScriptedFetcher;
    use crate::models::{SearchConfig, SearchPageResult};

    const CHALLENGE: &str = "<html><head><title>Just a moment...</title></head></html>";

    fn detail_page(description: &str) -> String {
        let block = json!({ "@type": "JobPosting", "description": description });
        format!(r#"<html><script type="application/ld+json">{block}</script></html>"#)
    }

    fn entry(value: serde_json::Value) -> RawResultEntry {
        serde_json::from_value(value).unwrap()
    }

    fn clean_entry() -> RawResultEntry {
        entry(json!({
            "title": "SOC Analyst",
            "truncatedCompany": "Acme",
            "jobLocationCity": "Austin",
            "jobLocationState": "TX",
            "remoteWorkModel": { "inlineText": "Remote" },
            "estimatedSalary": { "formattedRange": "$90K a year" },
            "jobCardRequirementsModel": {
                "jobTagRequirements": [],
                "jobOnlyRequirements": [{ "label": "SIEM" }, { "label": "Python" }]
            },
            "noJsUrl": "/viewjob?jk=1"
        }))
    }

    struct Harness {
        fetcher: ScriptedFetcher,
        parser: PageParser,
        filter: ClearanceFilter,
    }

    impl Harness {
        fn new(fetcher: ScriptedFetcher) -> Self {
            Self {
                fetcher,
                parser: PageParser::new(&SearchConfig::default()).unwrap(),
                filter: ClearanceFilter::default(),
            }
        }

        fn extractor(&self) -> RecordExtractor<'_> {
            RecordExtractor::new(&self.fetcher, &self.parser, &self.filter, "https://indeed.com", 5)
        }
    }

    #[tokio::test]
    async fn test_builds_record_from_listing_and_detail() {
        let h = Harness::new(
            ScriptedFetcher::new()
                .respond("https://indeed.com/viewjob?jk=1", detail_page("<p>Triage <b>alerts</b></p>")),
        );

        let record = h.extractor().extract(&clean_entry()).await.unwrap();
        assert_eq!(record.name, "SOC Analyst");
        assert_eq!(record.company, "Acme");
        assert_eq!(record.description, "Triage alerts");
        assert_eq!(record.salary, "$90K a year");
        assert_eq!(record.remote, "Remote");
        assert_eq!(record.requirements, "SIEM,Python");
        assert_eq!(record.city, "Austin");
        assert_eq!(record.state, "TX");
        assert_eq!(record.link, "https://indeed.com/viewjob?jk=1");
        assert_eq!(h.fetcher.calls()[0].wait_secs, 5);
    }

    #[tokio::test]
    async fn test_clearance_tag_skips_fetch() {
        let h = Harness::new(ScriptedFetcher::new());
        let e = entry(json!({
            "title": "Analyst",
            "noJsUrl": "/viewjob?jk=2",
            "jobCardRequirementsModel": {
                "jobTagRequirements": [{ "label": "Security clearance", "requirementsHiddenText": "" }]
            }
        }));

        assert_eq!(
            h.extractor().process(&e).await,
            Extraction::Rejected(Rejection::ClearanceTag)
        );
        assert!(h.fetcher.calls().is_empty());
    }

    #[tokio::test]
    async fn test_clearance_title_skips_fetch() {
        let h = Harness::new(ScriptedFetcher::new());
        let e = entry(json!({ "title": "Cyber Analyst (Public Trust)", "noJsUrl": "/viewjob?jk=3" }));

        assert!(h.extractor().extract(&e).await.is_none());
        assert!(h.fetcher.calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_detail_path_is_rejected() {
        let h = Harness::new(ScriptedFetcher::new());
        let e = entry(json!({ "title": "SOC Analyst" }));

        assert_eq!(
            h.extractor().process(&e).await,
            Extraction::Rejected(Rejection::MissingDetailPath)
        );
        assert!(h.fetcher.calls().is_empty());
    }

    #[tokio::test]
    async fn test_challenge_retries_once_without_wait() {
        let url = "https://indeed.com/viewjob?jk=1";
        let h = Harness::new(
            ScriptedFetcher::new()
                .respond(url, CHALLENGE)
                .respond(url, detail_page("Real description")),
        );

        let record = h.extractor().extract(&clean_entry()).await.unwrap();
        assert_eq!(record.description, "Real description");

        let calls = h.fetcher.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].wait_secs, 0);
    }

    #[tokio::test]
    async fn test_missing_linked_data_uses_fallback() {
        let h = Harness::new(
            ScriptedFetcher::new().respond("https://indeed.com/viewjob?jk=1", "<html></html>"),
        );

        let record = h.extractor().extract(&clean_entry()).await.unwrap();
        assert_eq!(record.description, NO_DESCRIPTION);
    }

    #[tokio::test]
    async fn test_fetch_failure_skips_entry() {
        let h = Harness::new(ScriptedFetcher::new().fail("https://indeed.com/viewjob?jk=1"));

        assert_eq!(
            h.extractor().process(&clean_entry()).await,
            Extraction::FetchFailed {
                url: "https://indeed.com/viewjob?jk=1".into()
            }
        );
    }

    #[tokio::test]
    async fn test_odd_field_types_keep_the_job() {
        let url = "https://indeed.com/viewjob?jk=1";
        let h = Harness::new(ScriptedFetcher::new().respond(url, detail_page("Watch alerts")));
        let data = json!({ "metaData": { "mosaicProviderJobCardsModel": { "results": [{
            "title": "SOC Analyst",
            "noJsUrl": "/viewjob?jk=1",
            "remoteWorkModel": { "inlineText": true, "type": "REMOTE_ALWAYS" },
            "jobCardRequirementsModel": {
                "jobOnlyRequirements": [{ "label": 3 }, { "label": "SIEM" }]
            }
        }] } } });
        let html = format!(
            r#"<script>window.mosaic.providerData["mosaic-provider-jobcards"]={data};</script>"#
        );

        let SearchPageResult::Extracted { results, .. } = h.parser.parse(&html) else {
            panic!("listing did not parse");
        };
        let record = h.extractor().extract(&results[0]).await.unwrap();
        assert_eq!(record.name, "SOC Analyst");
        assert_eq!(record.remote, "true");
        assert_eq!(record.requirements, "3,SIEM");
        assert_eq!(record.link, url);
    }
}
