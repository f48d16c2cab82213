// src/pipeline/validate.rs

use crate::error::Result;
use crate::models::Config;
use crate::services::PageParser;
use crate::utils::log::{header, sub_item, success};

/// Validate configuration and make sure the page patterns compile.
pub fn run_validate(config: &Config) -> Result<()> {
    header("Validating configuration");

    if let Err(e) = config.validate().and_then(|_| PageParser::new(&config.search).map(|_| ())) {
        log::error!("Config validation failed: {}", e);
        return Err(e);
    }

    success("Config OK");
    sub_item(&format!("User agent: {}", config.crawler.user_agent));
    sub_item(&format!("Timeout: {}s", config.crawler.timeout_secs));
    sub_item(&format!("Search endpoint: {}", config.search.base_url));
    sub_item(&format!("Fallback total: {}", config.search.fallback_total));
    sub_item(&format!(
        "Clearance keywords: {}",
        config.filter.clearance_keywords.len()
    ));
    sub_item(&format!("Output directory: {}", config.output.dir));
    Ok(())
}
