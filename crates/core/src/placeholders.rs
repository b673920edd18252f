//! Placeholder tokens in RAG queries and generation prompts.
//!
//! The backend substitutes `{token}` occurrences at generation time. The
//! editor only inspects them so it can flag tokens the backend will not fill.

use std::sync::LazyLock;

use regex::Regex;

pub const PRODUCT_NAME: &str = "product_name";
pub const PRODUCT_CATEGORY: &str = "product_category";
/// Filled with retrieved client documents.
pub const CLIENT_DATA_CONTEXT: &str = "client_data_context";
pub const TECHNICAL_SPECS: &str = "technical_specs";
pub const COMPETITOR_INSIGHTS: &str = "competitor_insights";

/// Every token the backend knows how to substitute.
pub const KNOWN_PLACEHOLDERS: &[&str] = &[
    PRODUCT_NAME,
    PRODUCT_CATEGORY,
    CLIENT_DATA_CONTEXT,
    TECHNICAL_SPECS,
    COMPETITOR_INSIGHTS,
];

pub const PLACEHOLDER_PATTERN: &str = r"\{[a-zA-Z_][a-zA-Z0-9_]*\}";

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PLACEHOLDER_PATTERN).expect("valid regex"));

/// Sorted, de-duplicated placeholder names (without braces) found in `text`.
pub fn extract_placeholders(text: &str) -> Vec<String> {
    let mut names: Vec<String> = PLACEHOLDER_RE
        .find_iter(text)
        .map(|m| {
            let s = m.as_str();
            s[1..s.len() - 1].to_string()
        })
        .collect();
    names.sort();
    names.dedup();
    names
}

/// Placeholders in `text` the backend will leave unsubstituted.
pub fn unknown_placeholders(text: &str) -> Vec<String> {
    extract_placeholders(text)
        .into_iter()
        .filter(|name| !KNOWN_PLACEHOLDERS.contains(&name.as_str()))
        .collect()
}
