//! Utility functions and helpers.

pub mod json;
pub mod log;
pub mod text;
pub mod url;

/// File-name-safe stem for a search query.
pub fn query_stem(query: &str) -> String {
    query.trim().replace([' ', '/', '\\'], "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_stem() {
        assert_eq!(query_stem("security analyst"), "security_analyst");
        assert_eq!(query_stem(" soc "), "soc");
        assert_eq!(query_stem("C/C++ developer"), "C_C++_developer");
        assert_eq!(query_stem("ops\\dev"), "ops_dev");
    }
}
