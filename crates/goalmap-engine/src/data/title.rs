use std::sync::OnceLock;

use regex::Regex;

/// Connector words left dangling once a timestamp is cut off.
const DANGLING_SUFFIXES: [&str; 2] = [" от", " from"];

fn timestamp_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"[:]?\s*\d{2}\.\d{2}\.\d{4}.*").ok())
        .as_ref()
}

/// Reduce an auto-generated note title to the part worth showing on the Sun.
///
/// `"Groceries: 01.02.2024 10:00 - done 02.02.2024"` becomes `"Groceries"`.
pub fn clean_title(raw: &str) -> String {
    let head = raw.split(" - ").next().unwrap_or(raw);
    let mut title = match timestamp_pattern() {
        Some(re) => re.replace(head, "").trim().to_string(),
        None => head.trim().to_string(),
    };
    for suffix in DANGLING_SUFFIXES {
        if let Some(rest) = title.strip_suffix(suffix) {
            title = rest.trim_end().to_string();
        }
    }
    title
}
