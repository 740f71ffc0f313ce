//! Notion API type definitions.
//!
//! Only the parts of the page and database objects this crate reads or writes
//! are modelled; everything else in a payload is ignored on deserialization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Rich text segment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RichText {
    /// Segment type: text, mention or equation
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// Text without annotations
    #[serde(default)]
    pub plain_text: String,
    /// Link target, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

impl RichText {
    /// Whether this is a plain `text` segment.
    #[must_use]
    pub fn is_text(&self) -> bool {
        self.kind.as_deref() == Some("text")
    }
}

/// Concatenate the plain text of every segment.
#[must_use]
pub fn plain_text(segments: &[RichText]) -> String {
    segments.iter().map(|s| s.plain_text.as_str()).collect()
}

/// Notion database object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Database {
    /// Unique identifier
    pub id: String,
    /// Database title
    #[serde(default)]
    pub title: Vec<RichText>,
    /// Property schema, keyed by property name
    #[serde(default)]
    pub properties: BTreeMap<String, PropertySchema>,
    /// URL to the database
    #[serde(default)]
    pub url: Option<String>,
    /// Whether the database is archived
    #[serde(default)]
    pub archived: bool,
}

impl Database {
    /// Plain text of the first `text` title segment.
    #[must_use]
    pub fn title_text(&self) -> Option<&str> {
        self.title
            .iter()
            .find(|t| t.is_text())
            .map(|t| t.plain_text.as_str())
    }
}

/// Schema entry for a single database property
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertySchema {
    /// Property identifier (stable across renames)
    pub id: String,
    /// Property name
    #[serde(default)]
    pub name: String,
    /// Property type
    #[serde(rename = "type")]
    pub kind: PropertyKind,
}

/// Property types known to this crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    Title,
    RichText,
    Number,
    Select,
    MultiSelect,
    Status,
    Date,
    People,
    Files,
    Checkbox,
    Url,
    Email,
    PhoneNumber,
    Formula,
    Relation,
    Rollup,
    CreatedTime,
    CreatedBy,
    LastEditedTime,
    LastEditedBy,
    /// Any type this crate does not handle (buttons, unique ids, ...)
    #[serde(other)]
    Unsupported,
}

impl PropertyKind {
    /// Wire name of the type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::RichText => "rich_text",
            Self::Number => "number",
            Self::Select => "select",
            Self::MultiSelect => "multi_select",
            Self::Status => "status",
            Self::Date => "date",
            Self::People => "people",
            Self::Files => "files",
            Self::Checkbox => "checkbox",
            Self::Url => "url",
            Self::Email => "email",
            Self::PhoneNumber => "phone_number",
            Self::Formula => "formula",
            Self::Relation => "relation",
            Self::Rollup => "rollup",
            Self::CreatedTime => "created_time",
            Self::CreatedBy => "created_by",
            Self::LastEditedTime => "last_edited_time",
            Self::LastEditedBy => "last_edited_by",
            Self::Unsupported => "unsupported",
        }
    }

    /// Whether pages can set a value of this type.
    #[must_use]
    pub const fn is_writable(self) -> bool {
        matches!(
            self,
            Self::Title
                | Self::RichText
                | Self::Number
                | Self::Select
                | Self::MultiSelect
                | Self::Status
                | Self::Date
                | Self::People
                | Self::Checkbox
                | Self::Url
                | Self::Email
                | Self::PhoneNumber
                | Self::Relation
        )
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Select, multi-select or status option
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectOption {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

/// Reference to a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRef {
    pub id: String,
    #[serde(default)]
    pub object: Option<String>,
}

/// Reference to a related page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRef {
    pub id: String,
}

/// Date or date range as sent by Notion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateValue {
    /// ISO 8601 date or datetime
    pub start: String,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub time_zone: Option<String>,
}

/// URL of an uploaded or linked file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileUrl {
    pub url: String,
    #[serde(default)]
    pub expiry_time: Option<String>,
}

/// Entry of a `files` property
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileObject {
    #[serde(default)]
    pub name: String,
    /// `external` or `file`
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub external: Option<FileUrl>,
    #[serde(default)]
    pub file: Option<FileUrl>,
}

impl FileObject {
    /// URL of the file, wherever it is hosted.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.external
            .as_ref()
            .or(self.file.as_ref())
            .map(|f| f.url.as_str())
    }
}

/// Computed value of a formula property
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FormulaValue {
    String {
        #[serde(default)]
        string: Option<String>,
    },
    Number {
        #[serde(default)]
        number: Option<f64>,
    },
    Boolean {
        #[serde(default)]
        boolean: Option<bool>,
    },
    Date {
        #[serde(default)]
        date: Option<DateValue>,
    },
}

/// Computed value of a rollup property
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RollupValue {
    Number {
        #[serde(default)]
        number: Option<f64>,
    },
    Date {
        #[serde(default)]
        date: Option<DateValue>,
    },
    Array {
        #[serde(default)]
        array: Vec<PropertyValue>,
    },
    #[serde(other)]
    Unsupported,
}

/// Value of a page property, tagged by its `type`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyValue {
    Title {
        #[serde(default)]
        title: Vec<RichText>,
    },
    RichText {
        #[serde(default)]
        rich_text: Vec<RichText>,
    },
    Number {
        #[serde(default)]
        number: Option<f64>,
    },
    Select {
        #[serde(default)]
        select: Option<SelectOption>,
    },
    Status {
        #[serde(default)]
        status: Option<SelectOption>,
    },
    MultiSelect {
        #[serde(default)]
        multi_select: Vec<SelectOption>,
    },
    Date {
        #[serde(default)]
        date: Option<DateValue>,
    },
    Relation {
        #[serde(default)]
        relation: Vec<PageRef>,
    },
    People {
        #[serde(default)]
        people: Vec<UserRef>,
    },
    Checkbox {
        #[serde(default)]
        checkbox: bool,
    },
    Url {
        #[serde(default)]
        url: Option<String>,
    },
    Email {
        #[serde(default)]
        email: Option<String>,
    },
    PhoneNumber {
        #[serde(default)]
        phone_number: Option<String>,
    },
    CreatedBy {
        created_by: UserRef,
    },
    CreatedTime {
        created_time: DateTime<Utc>,
    },
    LastEditedBy {
        last_edited_by: UserRef,
    },
    LastEditedTime {
        last_edited_time: DateTime<Utc>,
    },
    Files {
        #[serde(default)]
        files: Vec<FileObject>,
    },
    Formula {
        formula: FormulaValue,
    },
    Rollup {
        rollup: RollupValue,
    },
    #[serde(other)]
    Unsupported,
}

/// Parent of a page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageParent {
    /// `database_id`, `page_id` or `workspace`
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub database_id: Option<String>,
    #[serde(default)]
    pub page_id: Option<String>,
}

/// Notion page object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Unique identifier
    pub id: String,
    /// Parent database or page
    #[serde(default)]
    pub parent: Option<PageParent>,
    /// Whether the page is archived
    #[serde(default)]
    pub archived: bool,
    /// Property values, keyed by property name
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyValue>,
    /// URL to the page
    #[serde(default)]
    pub url: Option<String>,
    /// Created timestamp
    #[serde(default)]
    pub created_time: Option<DateTime<Utc>>,
    /// Last edited timestamp
    #[serde(default)]
    pub last_edited_time: Option<DateTime<Utc>>,
}

impl Page {
    /// Whether the page is a row of the given database.
    ///
    /// Ids are compared without dashes since Notion accepts both forms.
    #[must_use]
    pub fn belongs_to(&self, database_id: &str) -> bool {
        self.parent
            .as_ref()
            .and_then(|p| p.database_id.as_deref())
            .is_some_and(|id| normalize_id(id) == normalize_id(database_id))
    }
}

/// Strip dashes and lowercase a Notion id.
#[must_use]
pub fn normalize_id(id: &str) -> String {
    id.chars()
        .filter(|c| *c != '-')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Page creation body
#[derive(Debug, Clone, Serialize)]
pub struct CreatePageRequest {
    pub parent: DatabaseParent,
    pub properties: Map<String, Value>,
}

/// Database parent reference used when creating pages
#[derive(Debug, Clone, Serialize)]
pub struct DatabaseParent {
    pub database_id: String,
}

/// Page update body
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdatePageRequest {
    pub properties: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
}

/// Database query body, minus the database id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FindQuery {
    /// Notion filter object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
    /// Sort criteria, applied in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sorts: Vec<Value>,
    /// Cursor from a previous response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<String>,
    /// Maximum number of results (Notion caps this at 100)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

impl FindQuery {
    /// Query matching every page.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the filter object.
    #[must_use]
    pub fn filter(mut self, filter: Value) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Append a sort criterion.
    #[must_use]
    pub fn sort(mut self, sort: Value) -> Self {
        self.sorts.push(sort);
        self
    }

    /// Limit the number of results.
    #[must_use]
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Resume from a cursor.
    #[must_use]
    pub fn start_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.start_cursor = Some(cursor.into());
        self
    }
}

/// Database query response
#[derive(Debug, Clone, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub results: Vec<Page>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

/// Search response restricted to databases
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<Database>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

/// Error body returned by Notion on non-2xx responses
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_property_kind_unknown_type() {
        let schema: PropertySchema =
            serde_json::from_value(json!({"id": "abc", "name": "Button", "type": "button"}))
                .unwrap();
        assert_eq!(schema.kind, PropertyKind::Unsupported);
    }

    #[test]
    fn test_property_kind_roundtrip_names() {
        let kind: PropertyKind = serde_json::from_value(json!("last_edited_time")).unwrap();
        assert_eq!(kind, PropertyKind::LastEditedTime);
        assert_eq!(kind.to_string(), "last_edited_time");
        assert!(!kind.is_writable());
        assert!(PropertyKind::Status.is_writable());
    }

    #[test]
    fn test_property_value_deserialize() {
        let value: PropertyValue = serde_json::from_value(json!({
            "id": "title",
            "type": "title",
            "title": [
                {"type": "text", "plain_text": "Hello "},
                {"type": "text", "plain_text": "world"}
            ]
        }))
        .unwrap();

        match value {
            PropertyValue::Title { title } => assert_eq!(plain_text(&title), "Hello world"),
            other => panic!("unexpected value: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_property_value_is_unsupported() {
        let value: PropertyValue = serde_json::from_value(json!({
            "id": "x",
            "type": "unique_id",
            "unique_id": {"prefix": "TSK", "number": 4}
        }))
        .unwrap();
        assert!(matches!(value, PropertyValue::Unsupported));
    }

    #[test]
    fn test_database_title_text() {
        let database: Database = serde_json::from_value(json!({
            "id": "db",
            "title": [
                {"type": "mention", "plain_text": "@someone"},
                {"type": "text", "plain_text": "Tasks"}
            ],
            "properties": {}
        }))
        .unwrap();
        assert_eq!(database.title_text(), Some("Tasks"));
    }

    #[test]
    fn test_page_belongs_to() {
        let page: Page = serde_json::from_value(json!({
            "id": "page",
            "parent": {"type": "database_id", "database_id": "d9824bdc-8445-4327-be8b-5b47500af6ce"},
            "properties": {}
        }))
        .unwrap();
        assert!(page.belongs_to("d9824bdc84454327be8b5b47500af6ce"));
        assert!(!page.belongs_to("another"));
    }

    #[test]
    fn test_find_query_serialization() {
        let query = FindQuery::new()
            .filter(json!({"property": "Done", "checkbox": {"equals": false}}))
            .page_size(10);

        let body = serde_json::to_value(&query).unwrap();
        assert_eq!(body["page_size"], 10);
        assert!(body.get("sorts").is_none());
        assert!(body.get("start_cursor").is_none());
        assert_eq!(body["filter"]["property"], "Done");
    }

    #[test]
    fn test_file_url_hosted() {
        let file: FileObject = serde_json::from_value(json!({
            "name": "spec.pdf",
            "type": "file",
            "file": {"url": "https://files.example/spec.pdf", "expiry_time": "2024-01-01T00:00:00.000Z"}
        }))
        .unwrap();
        assert_eq!(file.url(), Some("https://files.example/spec.pdf"));
    }
}
