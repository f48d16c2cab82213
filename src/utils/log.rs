// src/utils/log.rs

//! Narration helpers for crawl progress and end-of-run reports.
//!
//! Everything goes through the `log` facade so the binary's logger decides
//! formatting and filtering.

/// Log a header
pub fn header(title: &str) {
    let border = "═".repeat(60);
    log::info!("{}", border);
    log::info!("  {}", title);
    log::info!("{}", border);
}

/// Log a step in a process
pub fn step(step_num: usize, total: usize, message: &str) {
    log::info!("[STEP {}/{}] {}", step_num, total, message);
}

/// Log a success message
pub fn success(message: &str) {
    log::info!("✓ {}", message);
}

/// Log a sub-item (indented)
pub fn sub_item(message: &str) {
    log::info!("    {}", message);
}

/// Log a summary section
pub fn summary(title: &str, items: &[(&str, String)]) {
    log::info!("[SUMMARY] {}", title);
    for (key, value) in items {
        log::info!("    {}: {}", key, value);
    }
}

/// Number of listing pages needed to cover `total` jobs.
pub fn page_estimate(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_estimate() {
        assert_eq!(page_estimate(500, 25), 20);
        assert_eq!(page_estimate(501, 25), 21);
        assert_eq!(page_estimate(0, 25), 0);
        assert_eq!(page_estimate(10, 0), 0);
    }
}
