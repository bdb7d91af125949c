//! Note record parsing.
//!
//! # Responsibility
//! - Extract id, creation time, tags and content from a `<note>` record.
//!
//! # Invariants
//! - `guid`, `created` and `content` are required; `tag` may repeat or be
//!   absent.
//! - `created` must be an RFC 3339 timestamp, e.g. `2014-01-03T00:00:00Z`.
//! - Parsing never panics on malformed input.

use crate::model::document::{Document, DocumentValidationError};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Closing marker line of a note record.
pub const NOTE_CLOSE_MARKER: &str = "</note>";

static NOTE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<note>(.*?)</note>").expect("valid note regex"));
static GUID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<guid>(.*?)</guid>").expect("valid guid regex"));
static CREATED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<created>(.*?)</created>").expect("valid created regex"));
static TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<tag>(.*?)</tag>").expect("valid tag regex"));
static CONTENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<content>(.*?)</content>").expect("valid content regex"));

pub type RecordResult<T> = Result<T, RecordError>;

/// Malformed note record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// Required element is absent or blank.
    MissingField(&'static str),
    /// `created` value is not a valid timestamp.
    InvalidTimestamp { value: String, message: String },
    /// Input ended before the closing `</note>` line.
    Truncated,
    /// Extracted fields do not form a valid document.
    InvalidDocument(DocumentValidationError),
}

impl Display for RecordError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "malformed note record: missing `{field}`"),
            Self::InvalidTimestamp { value, message } => write!(
                f,
                "malformed note record: invalid created timestamp `{value}`: {message}"
            ),
            Self::Truncated => write!(f, "malformed note record: missing `{NOTE_CLOSE_MARKER}`"),
            Self::InvalidDocument(err) => write!(f, "malformed note record: {err}"),
        }
    }
}

impl Error for RecordError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidDocument(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DocumentValidationError> for RecordError {
    fn from(value: DocumentValidationError) -> Self {
        Self::InvalidDocument(value)
    }
}

/// Parses one `<note>...</note>` record into a live document.
///
/// # Errors
/// - [`RecordError::MissingField`] when `note`, `guid`, `created` or
///   `content` is absent, or `guid`/`created` is blank.
/// - [`RecordError::InvalidTimestamp`] when `created` is not RFC 3339.
pub fn parse_note_record(text: &str) -> RecordResult<Document> {
    let note = capture(&NOTE_RE, text).ok_or(RecordError::MissingField("note"))?;

    let guid = required(&GUID_RE, note, "guid")?;
    let created_text = required(&CREATED_RE, note, "created")?;
    let content = capture(&CONTENT_RE, note).ok_or(RecordError::MissingField("content"))?;
    let tags = TAG_RE
        .captures_iter(note)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()));

    let created = parse_created(created_text)?;
    Ok(Document::new(guid, created, tags, content)?)
}

/// Parses a record `created` value as a UTC timestamp.
pub fn parse_created(value: &str) -> RecordResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|err| RecordError::InvalidTimestamp {
            value: value.to_string(),
            message: err.to_string(),
        })
}

fn capture<'t>(re: &Regex, text: &'t str) -> Option<&'t str> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn required<'t>(re: &Regex, text: &'t str, field: &'static str) -> RecordResult<&'t str> {
    capture(re, text)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(RecordError::MissingField(field))
}
