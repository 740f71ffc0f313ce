//! Configuration for the Notion client and type generator.

use std::env;
use std::path::PathBuf;

/// Default Notion REST endpoint.
pub const DEFAULT_API_URL: &str = "https://api.notion.com/v1";

/// Notion API version sent with every request.
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";

/// Default directory for generated type files.
pub const DEFAULT_TYPES_PATH: &str = "src/notion_types";

/// Notionable configuration.
#[derive(Clone)]
pub struct Config {
    /// Notion integration token.
    pub token: Option<String>,
    /// Base URL of the Notion REST API.
    pub api_url: String,
    /// Value of the `Notion-Version` header.
    pub notion_version: String,
    /// Directory generated type files are written to.
    pub types_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token: env::var("NOTION_TOKEN").ok().filter(|s| !s.is_empty()),
            api_url: env::var("NOTION_API_URL")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            notion_version: env::var("NOTION_VERSION")
                .unwrap_or_else(|_| DEFAULT_NOTION_VERSION.to_string()),
            types_path: env::var("NOTIONABLE_TYPES_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_TYPES_PATH)),
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("api_url", &self.api_url)
            .field("notion_version", &self.notion_version)
            .field("types_path", &self.types_path)
            .finish()
    }
}

/// Options for connecting to a workspace.
#[derive(Debug, Clone)]
pub struct NotionableOptions {
    /// Notion integration token.
    pub auth: String,
    /// Base URL of the Notion REST API.
    pub api_url: String,
    /// Value of the `Notion-Version` header.
    pub notion_version: String,
}

impl NotionableOptions {
    /// Options for the public API with the given token.
    pub fn new(auth: impl Into<String>) -> Self {
        Self {
            auth: auth.into(),
            api_url: DEFAULT_API_URL.to_string(),
            notion_version: DEFAULT_NOTION_VERSION.to_string(),
        }
    }

    /// Point the client at another base URL (proxies, mock servers).
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }
}

impl Config {
    /// Build client options, if a token is configured.
    #[must_use]
    pub fn options(&self) -> Option<NotionableOptions> {
        self.token.as_ref().map(|token| NotionableOptions {
            auth: token.clone(),
            api_url: self.api_url.clone(),
            notion_version: self.notion_version.clone(),
        })
    }
}
