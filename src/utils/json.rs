//! Locating JSON values inlined in page markup.

use regex::Regex;

/// Slice the balanced JSON object or array starting at byte `start`.
///
/// Brackets inside string literals are ignored. Returns `None` when `start`
/// is not an opening bracket or the value never closes.
pub fn balanced_value(text: &str, start: usize) -> Option<&str> {
    let rest = text.get(start..)?;
    let (open, close) = match rest.chars().next()? {
        '{' => ('{', '}'),
        '[' => ('[', ']'),
        _ => return None,
    };

    let mut depth = 0usize;
    let mut in_str = false;
    let mut escape = false;
    for (offset, ch) in rest.char_indices() {
        if in_str {
            if escape {
                escape = false;
            } else if ch == '\\' {
                escape = true;
            } else if ch == '"' {
                in_str = false;
            }
            continue;
        }
        match ch {
            '"' => in_str = true,
            c if c == open => depth += 1,
            c if c == close => {
                depth -= 1;
                if depth == 0 {
                    return Some(&rest[..offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Find the first match of `marker` and slice the JSON value that follows it.
pub fn value_after_marker<'a>(text: &'a str, marker: &Regex) -> Option<&'a str> {
    let found = marker.find(text)?;
    let after = found.end();
    let offset = text[after..].find(|c: char| !c.is_whitespace())?;
    balanced_value(text, after + offset)
}
