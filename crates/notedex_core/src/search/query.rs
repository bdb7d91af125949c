//! Query term grammar.
//!
//! # Responsibility
//! - Split a query string into whitespace-delimited terms.
//! - Classify each term as tag, creation-date or content predicate.
//!
//! # Invariants
//! - Terms are lowercased before classification.
//! - `*` anchors a prefix match on the text before its first occurrence.
//! - A term that is empty after stripping its marker never matches anything.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use std::error::Error;
use std::fmt::{Display, Formatter};

const TAG_MARKER: &str = "tag:";
const CREATED_MARKER: &str = "created:";
const WILDCARD: char = '*';

/// Result type for query parsing and evaluation.
pub type SearchResult<T> = Result<T, SearchError>;

/// Query-layer error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// Term has no value after its marker (e.g. bare `tag:` or `*`).
    EmptyTerm(String),
    /// `created:` value is not a valid `YYYYMMDD` date.
    InvalidDate { term: String, message: String },
}

impl Display for SearchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTerm(term) => write!(f, "query term `{term}` has no value"),
            Self::InvalidDate { term, message } => {
                write!(f, "invalid date in query term `{term}`: {message}")
            }
        }
    }
}

impl Error for SearchError {}

/// Word match mode for tree-backed terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermMatch {
    Exact(String),
    Prefix(String),
}

impl TermMatch {
    /// Word or prefix text without the wildcard marker.
    pub fn text(&self) -> &str {
        match self {
            Self::Exact(text) | Self::Prefix(text) => text,
        }
    }
}

/// One classified query term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryTerm {
    /// `tag:<value>` resolved against the tag index.
    Tag(TermMatch),
    /// `created:<YYYYMMDD>`; matches live documents created on or after the
    /// date (UTC midnight).
    CreatedSince(DateTime<Utc>),
    /// Bare word resolved against the content index.
    Content(TermMatch),
}

/// Parsed query: classified terms plus terms that can never match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedQuery {
    pub terms: Vec<QueryTerm>,
    pub empty_terms: Vec<String>,
}

impl ParsedQuery {
    /// Returns whether evaluation yields an empty set without touching any
    /// index: no terms at all, or at least one empty term under AND.
    pub fn is_unsatisfiable(&self) -> bool {
        self.terms.is_empty() || !self.empty_terms.is_empty()
    }
}

/// Parses a whitespace-delimited query.
///
/// # Errors
/// - [`SearchError::InvalidDate`] for a malformed `created:` term.
///
/// Empty terms are collected in [`ParsedQuery::empty_terms`] instead of
/// failing the query.
pub fn parse_query(text: &str) -> SearchResult<ParsedQuery> {
    let mut parsed = ParsedQuery::default();
    for raw in text.split_whitespace() {
        match parse_term(raw) {
            Ok(term) => parsed.terms.push(term),
            Err(SearchError::EmptyTerm(term)) => parsed.empty_terms.push(term),
            Err(err) => return Err(err),
        }
    }
    Ok(parsed)
}

/// Classifies one query term. Marker matching is case-insensitive.
pub fn parse_term(raw: &str) -> SearchResult<QueryTerm> {
    let lowered = raw.trim().to_lowercase();

    if let Some(value) = lowered.strip_prefix(TAG_MARKER) {
        return parse_match(raw, value).map(QueryTerm::Tag);
    }
    if let Some(value) = lowered.strip_prefix(CREATED_MARKER) {
        return parse_date(raw, value).map(QueryTerm::CreatedSince);
    }
    parse_match(raw, &lowered).map(QueryTerm::Content)
}

fn parse_match(raw: &str, value: &str) -> SearchResult<TermMatch> {
    let term = match value.find(WILDCARD) {
        Some(pos) => TermMatch::Prefix(value[..pos].to_string()),
        None => TermMatch::Exact(value.to_string()),
    };
    if term.text().is_empty() {
        return Err(SearchError::EmptyTerm(raw.to_string()));
    }
    Ok(term)
}

fn parse_date(raw: &str, value: &str) -> SearchResult<DateTime<Utc>> {
    if value.is_empty() {
        return Err(SearchError::EmptyTerm(raw.to_string()));
    }
    let invalid = |message: &str| SearchError::InvalidDate {
        term: raw.to_string(),
        message: message.to_string(),
    };

    if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid("expected YYYYMMDD"));
    }

    // All-digit and 8 bytes long, so these parses cannot fail.
    let year: i32 = value[0..4].parse().map_err(|_| invalid("bad year"))?;
    let month: u32 = value[4..6].parse().map_err(|_| invalid("bad month"))?;
    let day: u32 = value[6..8].parse().map_err(|_| invalid("bad day"))?;

    let date =
        NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| invalid("not a calendar date"))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| invalid("not a calendar date"))?;
    Ok(Utc.from_utc_datetime(&midnight))
}
