//! # Search
//!
//! Filters the dataset down to the documents matching a query.
//!
//! ## Matching
//! - The query is a **regular expression** in the browser's dialect, not escaped, so `.` or `(` keep their pattern meaning
//! - It is rewritten for the `regex` crate first, see [`crate::pattern`]
//! - Case insensitive, unanchored: a document matches if the pattern is found anywhere in its title or its text
//! - Title is checked first, text only if the title misses
//!
//! ## Not Ranking
//! This is a filter. Results keep dataset order, nothing is scored or deduplicated.
//!
//! ## Patterns
//! The `regex` crate matches in linear time, so a hostile pattern cannot blow up matching cost.
//! It can still be expensive to compile, so the compiled size is capped and oversized patterns
//! are rejected like any other invalid one.
use regex::{Regex, RegexBuilder};
use thiserror::Error;

use crate::{dataset::Document, pattern::translate};

pub const PATTERN_SIZE_LIMIT: usize = 1 << 20;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Invalid search pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Invalid search pattern: {0}")]
    Syntax(&'static str),
}

pub fn compile_pattern(query: &str) -> Result<Regex, SearchError> {
    let pattern = RegexBuilder::new(&translate(query)?)
        .case_insensitive(true)
        .size_limit(PATTERN_SIZE_LIMIT)
        .build()?;

    Ok(pattern)
}

pub fn is_match(pattern: &Regex, document: &Document) -> bool {
    pattern.is_match(&document.title) || pattern.is_match(&document.text)
}

/// Returns clones of every document whose title or text matches `query`, in dataset order.
///
/// `query` is expected to be non-empty; the endpoint enforces that before calling in.
pub fn search(query: &str, documents: &[Document]) -> Result<Vec<Document>, SearchError> {
    let pattern = compile_pattern(query)?;

    Ok(documents
        .iter()
        .filter(|document| is_match(&pattern, document))
        .cloned()
        .collect())
}
