// src/utils/url.rs

//! URL construction for listing and detail pages.

use url::Url;

use crate::error::Result;

/// Build the listing URL for one offset.
///
/// The same inputs always produce the same string, which is what the
/// visited-page check relies on.
///
/// # Examples
/// ```
/// use job_crawler::utils::url::build_search_url;
///
/// assert_eq!(
///     build_search_url("https://indeed.com/jobs", "security analyst", "remote", 10).unwrap(),
///     "https://indeed.com/jobs?q=security+analyst&l=remote&start=10"
/// );
/// ```
pub fn build_search_url(base: &str, query: &str, location: &str, offset: usize) -> Result<String> {
    let offset = offset.to_string();
    let url = Url::parse_with_params(
        base,
        &[("q", query), ("l", location), ("start", offset.as_str())],
    )?;
    Ok(url.to_string())
}

/// Join a site-relative detail path onto the site root.
///
/// Absolute links are returned unchanged.
pub fn detail_url(site_root: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    let root = site_root.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{root}{path}")
    } else {
        format!("{root}/{path}")
    }
}
