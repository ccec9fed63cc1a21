use html2text::from_read;
use regex::Regex;
use std::sync::LazyLock;

use super::model::Item;

pub const EXCERPT_MAX_CHARS: usize = 160;

static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[^\s]+").expect("valid URL pattern"));
static WHITESPACE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// Short preview text for a memo: its summary when it has one, otherwise
/// the cleaned-up body cut to `EXCERPT_MAX_CHARS`.
pub fn excerpt(item: &Item) -> String {
    if let Some(summary) = item.summary.as_deref().map(str::trim) {
        if !summary.is_empty() {
            return summary.to_string();
        }
    }
    truncate(&clean_text(&item.body), EXCERPT_MAX_CHARS)
}

/// Strip HTML and URLs, collapse whitespace
pub fn clean_text(text: &str) -> String {
    let plain_text = from_read(text.as_bytes(), usize::MAX);
    let without_urls = URL_PATTERN.replace_all(&plain_text, "");
    let normalized = WHITESPACE_PATTERN.replace_all(&without_urls, " ");
    normalized.trim().to_string()
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        None => text.to_string(),
        Some((cut, _)) => format!("{}…", text[..cut].trim_end()),
    }
}
