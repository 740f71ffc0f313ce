//! Application-side value types for Notion properties.
//!
//! Generated record types refer to these for properties that have no plain
//! Rust counterpart.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{DateValue, FileObject};

/// A date, or a range of dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    /// Single point in time.
    #[must_use]
    pub fn at(start: DateTime<Utc>) -> Self {
        Self { start, end: None }
    }

    /// Range between two points in time.
    #[must_use]
    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    /// Convert a Notion date value. `None` when the start is not a valid date.
    #[must_use]
    pub fn from_notion(value: &DateValue) -> Option<Self> {
        let start = parse_date(&value.start)?;
        let end = value.end.as_deref().and_then(parse_date);
        Some(Self { start, end })
    }

    /// Notion `date` request object.
    #[must_use]
    pub fn to_notion(&self) -> Value {
        serde_json::json!({
            "start": format_date(&self.start),
            "end": self.end.as_ref().map(format_date),
        })
    }

    /// Accept either a `{ start, end }` object or a single date string.
    ///
    /// Both forms take bare dates as well as datetimes.
    #[must_use]
    pub fn from_input(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => parse_date(s).map(Self::at),
            Value::Object(range) => {
                let start = range.get("start").and_then(Value::as_str).and_then(parse_date)?;
                let end = match range.get("end") {
                    None | Some(Value::Null) => None,
                    Some(end) => Some(end.as_str().and_then(parse_date)?),
                };
                Some(Self { start, end })
            }
            _ => None,
        }
    }
}

/// Parse an ISO 8601 datetime, or a bare date as midnight UTC.
#[must_use]
pub fn parse_date(input: &str) -> Option<DateTime<Utc>> {
    if let Ok(datetime) = DateTime::parse_from_rfc3339(input) {
        return Some(datetime.with_timezone(&Utc));
    }

    if let Ok(datetime) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(datetime.and_utc());
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
}

/// Format a timestamp for Notion; midnight UTC is sent as a bare date.
#[must_use]
pub fn format_date(datetime: &DateTime<Utc>) -> String {
    if datetime.time() == NaiveTime::MIN {
        datetime.format("%Y-%m-%d").to_string()
    } else {
        datetime.to_rfc3339()
    }
}

/// File attached to a `files` property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    pub name: String,
    pub url: Option<String>,
}

impl From<&FileObject> for FileRef {
    fn from(file: &FileObject) -> Self {
        Self {
            name: file.name.clone(),
            url: file.url().map(str::to_string),
        }
    }
}

/// Result of a formula property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormulaResult {
    Boolean(bool),
    Number(f64),
    Date(DateRange),
    Text(String),
}
