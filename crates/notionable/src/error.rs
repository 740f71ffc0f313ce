//! Error types for the notionable crate.

use thiserror::Error;

/// Errors raised while talking to Notion or translating its payloads.
#[derive(Error, Debug)]
pub enum NotionableError {
    // API errors
    #[error("Notion API returned {status} ({code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid integration token")]
    InvalidToken,

    #[error("Invalid Notion-Version header value '{version}'")]
    InvalidNotionVersion { version: String },

    // Workspace errors
    #[error("Database '{name}' doesn't exist in the workspace")]
    DatabaseNotFound { name: String },

    #[error("Unsupported title in database '{database_id}'")]
    UnsupportedTitle { database_id: String },

    // Mapping errors
    #[error("Property '{property}' is not part of database '{database_id}'")]
    UnknownProperty {
        database_id: String,
        property: String,
    },

    #[error("Property '{property}' of type '{kind}' is unsupported or read-only")]
    UnsupportedProperty { property: String, kind: String },

    #[error("Invalid value for property '{property}': expected {expected}")]
    InvalidValue {
        property: String,
        expected: &'static str,
    },

    #[error("Item must serialize to an object, got {found}")]
    NotAnObject { found: &'static str },

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    // File errors
    #[error("Failed to write file '{path}': {reason}")]
    FileWrite { path: String, reason: String },

    #[error("Failed to read file '{path}': {reason}")]
    FileRead { path: String, reason: String },
}

impl NotionableError {
    /// Whether the API reported the object as missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }
}

/// Result type alias for notionable operations
pub type NotionableResult<T> = Result<T, NotionableError>;
