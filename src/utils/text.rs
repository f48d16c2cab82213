//! Text cleanup helpers.

use scraper::Html;

/// Strip markup from an HTML fragment, keeping its text.
///
/// Entities are decoded, whitespace inside each line is collapsed and blank
/// lines are dropped.
pub fn html_to_text(fragment: &str) -> String {
    let document = Html::parse_fragment(fragment);
    let raw: String = document.root_element().text().collect();
    raw.lines()
        .map(normalize_whitespace)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
