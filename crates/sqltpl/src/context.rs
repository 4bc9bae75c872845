//! Placeholder context validation.
//!
//! A placeholder is only allowed after one of [`KEYWORDS`]. The context is the
//! keyword match that ends closest to the placeholder.

use crate::error::{TemplateError, TemplateResult};
use regex::bytes::Regex;
use serde::Deserialize;
use std::sync::OnceLock;

/// Keywords after which a placeholder may appear.
pub const KEYWORDS: &[&str] = &[
    "SELECT",
    "FROM",
    "WHERE",
    "INSERT INTO",
    "VALUES",
    "UPDATE",
    "SET",
    "JOIN",
    "ON",
    "ORDER BY",
    "GROUP BY",
    "HAVING",
    "LIMIT",
    "OFFSET",
    "AND",
    "OR",
];

/// How a located keyword is compared against [`KEYWORDS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordCase {
    /// Verbatim: keywords are located case-insensitively, but a lowercase
    /// `where` is then not an allowed context.
    #[default]
    Strict,
    /// Uppercase the located keyword before the membership check.
    Insensitive,
}

fn keyword_regex() -> &'static Regex {
    static KEYWORD_RE: OnceLock<Regex> = OnceLock::new();
    KEYWORD_RE.get_or_init(|| {
        // ASCII-only case folding and word boundaries.
        let pattern = format!(r"(?i-u)\b({})\b", KEYWORDS.join("|"));
        Regex::new(&pattern).expect("invalid built-in keyword regex")
    })
}

/// The nearest keyword preceding the end of `prefix`, as written.
///
/// Matches are whole-word and non-overlapping, so the last match is the one
/// with the greatest ending offset.
pub fn find_context(prefix: &str) -> Option<&str> {
    keyword_regex()
        .find_iter(prefix.as_bytes())
        .last()
        .map(|m| &prefix[m.start()..m.end()])
}

/// Fail unless the text before a placeholder ends in an allowed context.
pub fn validate_context(prefix: &str, case: KeywordCase) -> TemplateResult<()> {
    let context = find_context(prefix).unwrap_or("");
    let allowed = match case {
        KeywordCase::Strict => KEYWORDS.contains(&context),
        KeywordCase::Insensitive => KEYWORDS.contains(&context.to_ascii_uppercase().as_str()),
    };

    if allowed {
        Ok(())
    } else {
        Err(TemplateError::InvalidContext(context.to_string()))
    }
}
