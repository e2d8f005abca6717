//! Article text extraction from HTML.
//!
//! The extractor is intentionally simple: the first `<h1>` is taken as the
//! title and every `<p>` in document order as the body. Layout heuristics
//! beyond that are out of scope.

use std::sync::LazyLock;

use regex::Regex;

use crate::parse::Document;
use crate::{LexiscoreError, Result};

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Collapses every whitespace run (newlines included) into one space and trims.
pub fn clean_text(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, " ").trim().to_string()
}

/// Extracts the cleaned article text from an HTML page.
///
/// The result is the first heading's text, a newline, and the newline-joined
/// text of all paragraphs, passed through [`clean_text`]; the newlines
/// therefore end up as single spaces.
///
/// # Errors
///
/// Returns [`LexiscoreError::NoContent`] when the page has neither a heading
/// nor any paragraph text.
pub fn extract_article_text(html: &str) -> Result<String> {
    let doc = Document::parse(html);

    let title = doc.select_first("h1")?.map(|h| h.stripped_text()).unwrap_or_default();
    let paragraphs: Vec<String> = doc.select("p")?.iter().map(|p| p.stripped_text()).collect();

    let text = clean_text(&format!("{}\n{}", title, paragraphs.join("\n")));

    if text.is_empty() { Err(LexiscoreError::NoContent) } else { Ok(text) }
}
