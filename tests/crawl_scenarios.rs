//! End-to-end crawls against scripted listing and detail pages.

use job_crawler::fetcher::ScriptedFetcher;
use job_crawler::models::{Config, SearchConfig};
use job_crawler::pipeline::{self, CrawlParams};
use job_crawler::services::{
    ClearanceFilter, CrawlStatus, NO_DESCRIPTION, PageParser, Paginator, RecordExtractor,
};
use job_crawler::storage::{LocalStorage, RecordStorage};
use job_crawler::utils::url::build_search_url;
use serde_json::{Value, json};

const QUERY: &str = "security analyst";
const LOCATION: &str = "remote";
const CHALLENGE: &str = "<html><head><title>Just a moment...</title></head><body></body></html>";

fn page_url(offset: usize) -> String {
    build_search_url("https://indeed.com/jobs", QUERY, LOCATION, offset).unwrap()
}

fn listing(results: Value, job_count: Option<usize>) -> String {
    let mut model = json!({ "results": results });
    if let Some(count) = job_count {
        model["tierSummaries"] = json!([{ "jobCount": count }]);
    }
    let data = json!({ "metaData": { "mosaicProviderJobCardsModel": model } });
    format!(
        r#"<html><head><script>window.mosaic.providerData["mosaic-provider-jobcards"]={data};</script></head><body></body></html>"#
    )
}

fn job(id: usize, title: &str) -> Value {
    json!({
        "title": title,
        "truncatedCompany": format!("Company {id}"),
        "jobLocationCity": "Denver",
        "jobLocationState": "CO",
        "remoteWorkModel": { "inlineText": "Remote" },
        "estimatedSalary": { "formattedRange": "$100K a year" },
        "jobCardRequirementsModel": {
            "jobTagRequirements": [{ "label": "Bachelor's degree" }],
            "jobOnlyRequirements": [{ "label": "SIEM" }]
        },
        "noJsUrl": format!("/viewjob?jk={id}")
    })
}

fn detail_url(id: usize) -> String {
    format!("https://indeed.com/viewjob?jk={id}")
}

fn detail_page(description: &str) -> String {
    let block = json!({ "@context": "https://schema.org", "@type": "JobPosting", "description": description });
    format!(r#"<html><head><script type="application/ld+json">{block}</script></head></html>"#)
}

struct Harness {
    fetcher: ScriptedFetcher,
    config: Config,
    parser: PageParser,
    filter: ClearanceFilter,
}

impl Harness {
    fn new(fetcher: ScriptedFetcher) -> Self {
        let mut config = Config::default();
        config.crawler.page_wait_secs = 0;
        config.crawler.detail_wait_secs = 0;
        let parser = PageParser::new(&config.search).unwrap();
        let filter = ClearanceFilter::new(&config.filter);
        Self {
            fetcher,
            config,
            parser,
            filter,
        }
    }

    fn paginator(&self) -> Paginator<'_> {
        let search: &SearchConfig = &self.config.search;
        let extractor = RecordExtractor::new(
            &self.fetcher,
            &self.parser,
            &self.filter,
            search.site_root.clone(),
            self.config.crawler.detail_wait_secs,
        );
        Paginator::new(&self.fetcher, &self.parser, extractor, search, &self.config.crawler)
    }
}

#[tokio::test]
async fn single_job_exhausts_immediately() {
    let fetcher = ScriptedFetcher::new()
        .respond(page_url(0), listing(json!([job(1, "SOC Analyst")]), Some(1)))
        .respond(detail_url(1), detail_page("<p>Monitor alerts</p>"));
    let h = Harness::new(fetcher);

    let outcome = h.paginator().crawl(QUERY, LOCATION).await.unwrap();

    assert_eq!(outcome.status, CrawlStatus::Exhausted);
    assert_eq!(outcome.final_offset, 1);
    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].description, "Monitor alerts");
    assert_eq!(outcome.records[0].requirements, "SIEM");
    assert_eq!(h.fetcher.fetch_count(&page_url(1)), 0);
}

#[tokio::test]
async fn empty_second_page_terminates_and_keeps_records() {
    let fetcher = ScriptedFetcher::new()
        .respond(
            page_url(0),
            listing(json!([job(1, "SOC Analyst"), job(2, "Threat Hunter")]), Some(300)),
        )
        .respond(page_url(2), listing(json!([]), Some(300)))
        .respond(detail_url(1), detail_page("One"))
        .respond(detail_url(2), detail_page("Two"));
    let h = Harness::new(fetcher);

    let outcome = h.paginator().crawl(QUERY, LOCATION).await.unwrap();

    assert_eq!(outcome.status, CrawlStatus::Terminated);
    assert_eq!(outcome.target_total, 300);
    assert_eq!(outcome.final_offset, 2);
    let descriptions: Vec<_> = outcome.records.iter().map(|r| r.description.as_str()).collect();
    assert_eq!(descriptions, ["One", "Two"]);
}

#[tokio::test]
async fn challenge_detail_page_is_retried() {
    let fetcher = ScriptedFetcher::new()
        .respond(page_url(0), listing(json!([job(7, "Incident Responder")]), Some(1)))
        .respond(detail_url(7), CHALLENGE)
        .respond(detail_url(7), detail_page("Respond to incidents"));
    let h = Harness::new(fetcher);

    let outcome = h.paginator().crawl(QUERY, LOCATION).await.unwrap();

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].description, "Respond to incidents");
    assert_ne!(outcome.records[0].description, NO_DESCRIPTION);
    assert_eq!(h.fetcher.fetch_count(&detail_url(7)), 2);
}

#[tokio::test]
async fn clearance_entries_never_fetch_details() {
    let mut tagged = job(1, "Network Analyst");
    tagged["jobCardRequirementsModel"]["jobTagRequirements"] =
        json!([{ "label": "Security clearance", "requirementsHiddenText": "" }]);
    let fetcher = ScriptedFetcher::new()
        .respond(
            page_url(0),
            listing(
                json!([tagged, job(2, "Analyst, TS/SCI"), job(3, "Cloud Analyst")]),
                Some(3),
            ),
        )
        .respond(detail_url(3), detail_page("Cloud work"));
    let h = Harness::new(fetcher);

    let outcome = h.paginator().crawl(QUERY, LOCATION).await.unwrap();

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].name, "Cloud Analyst");
    assert_eq!(outcome.rejected, 2);
    assert_eq!(h.fetcher.fetch_count(&detail_url(1)), 0);
    assert_eq!(h.fetcher.fetch_count(&detail_url(2)), 0);
}

#[tokio::test]
async fn unparseable_pages_are_reported_and_skipped_by_one() {
    let fetcher = ScriptedFetcher::new()
        .respond(page_url(0), listing(json!([job(1, "SOC Analyst")]), Some(4)))
        .respond(page_url(1), "<html><body>Something went wrong</body></html>")
        .respond(page_url(2), listing(json!([job(2, "Threat Hunter"), job(3, "Red Teamer")]), Some(4)))
        .respond(detail_url(1), detail_page("One"))
        .respond(detail_url(2), detail_page("Two"))
        .respond(detail_url(3), detail_page("Three"));
    let h = Harness::new(fetcher);

    let outcome = h.paginator().crawl(QUERY, LOCATION).await.unwrap();

    assert_eq!(outcome.status, CrawlStatus::Exhausted);
    assert_eq!(outcome.bad_pages, vec![page_url(1)]);
    assert_eq!(outcome.final_offset, 4);
    assert_eq!(outcome.records.len(), 3);
}

#[tokio::test]
async fn failed_first_page_is_fatal() {
    let h = Harness::new(ScriptedFetcher::new().fail(page_url(0)));
    assert!(h.paginator().crawl(QUERY, LOCATION).await.is_err());
}

#[tokio::test]
async fn pipeline_writes_records_that_read_back() {
    let fetcher = ScriptedFetcher::new()
        .respond(page_url(0), listing(json!([job(1, "SOC Analyst")]), Some(1)))
        .respond(detail_url(1), detail_page("Monitor &amp; respond"));
    let mut config = Config::default();
    config.crawler.page_wait_secs = 0;
    config.crawler.detail_wait_secs = 0;
    let dir = tempfile::tempdir().unwrap();
    let storage = LocalStorage::new(dir.path());

    let params = CrawlParams {
        query: QUERY.to_string(),
        location: LOCATION.to_string(),
        wait_secs: Some(0),
    };
    let report = pipeline::run_crawler(&config, &fetcher, &storage, &params).await.unwrap();

    let location = report.output.expect("records were written");
    let loaded = storage.load_records(&location).await.unwrap();
    assert_eq!(loaded, report.outcome.records);
    assert_eq!(loaded[0].description, "Monitor & respond");
    assert_eq!(loaded[0].link, "https://indeed.com/viewjob?jk=1");

    let shown = pipeline::run_show(&storage, &location).await.unwrap();
    assert_eq!(shown.len(), 1);
}

#[tokio::test]
async fn pipeline_without_records_writes_nothing() {
    let fetcher = ScriptedFetcher::new().respond(page_url(0), listing(json!([]), Some(0)));
    let config = Config::default();
    let dir = tempfile::tempdir().unwrap();
    let storage = LocalStorage::new(dir.path().join("out"));
    let params = CrawlParams {
        query: QUERY.to_string(),
        location: LOCATION.to_string(),
        wait_secs: Some(0),
    };

    let report = pipeline::run_crawler(&config, &fetcher, &storage, &params).await.unwrap();

    assert!(report.output.is_none());
    assert_eq!(report.outcome.status, CrawlStatus::Terminated);
    assert!(!dir.path().join("out").exists());
}

#[tokio::test]
async fn authentication_uses_search_url() {
    let session = std::collections::HashMap::from([("CTK".to_string(), "token".to_string())]);
    let fetcher = ScriptedFetcher::new().with_session(session.clone());
    let params = CrawlParams::from_config(&Config::default());

    let cookies = pipeline::authenticate(&Config::default(), &fetcher, &params).await.unwrap();
    assert_eq!(cookies, session);
}
