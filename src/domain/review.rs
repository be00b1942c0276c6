//! Review records and read-date normalization

use chrono::{DateTime, FixedOffset};
use serde::{Serialize, Serializer};

/// Format Goodreads uses for `read_at`, `started_at` and `date_added`,
/// e.g. `Fri Mar 04 00:00:00 -0800 2016`
pub const GOODREADS_DATE_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// Outcome of normalizing a free-text date field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ReadAt {
    /// Text matched the Goodreads date format
    Date(DateTime<FixedOffset>),
    /// Text was present but did not parse; kept verbatim
    Unparsed(String),
    /// Field absent or blank
    #[default]
    Empty,
}

impl ReadAt {
    pub fn as_date(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            ReadAt::Date(date) => Some(date),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ReadAt::Empty)
    }
}

// Downstream consumers see a plain string either way: RFC 3339 for parsed
// dates, the original text otherwise.
impl Serialize for ReadAt {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ReadAt::Date(date) => serializer.serialize_str(&date.to_rfc3339()),
            ReadAt::Unparsed(raw) => serializer.serialize_str(raw),
            ReadAt::Empty => serializer.serialize_str(""),
        }
    }
}

/// Normalize a raw date field.
///
/// Total over its input: absent or `""` gives `Empty`, text in the Goodreads
/// format gives `Date`, anything else is echoed back as `Unparsed`.
pub fn parse_date(raw: Option<&str>) -> ReadAt {
    let Some(raw) = raw else {
        return ReadAt::Empty;
    };

    if raw.is_empty() {
        return ReadAt::Empty;
    }

    match DateTime::parse_from_str(raw.trim(), GOODREADS_DATE_FORMAT) {
        Ok(date) => ReadAt::Date(date),
        Err(e) => {
            tracing::debug!("Keeping unparsed date {:?}: {}", raw, e);
            ReadAt::Unparsed(raw.to_string())
        }
    }
}

/// Book attached to a review
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReviewBook {
    pub id: Option<String>,
    pub title: Option<String>,
    pub isbn: Option<String>,
    pub isbn13: Option<String>,
    pub authors: Vec<String>,
}

/// A single review as returned by the reviews listing, with dates normalized
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Review {
    pub id: String,
    pub rating: Option<u8>,
    pub read_at: ReadAt,
    pub started_at: ReadAt,
    pub date_added: ReadAt,
    pub book: Option<ReviewBook>,
}
