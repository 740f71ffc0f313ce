//! Per-database field mappings.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::{NotionableError, NotionableResult};
use crate::models::Database;
use crate::naming::database_name;
use crate::typegen::properties_map;

/// Schema description of one database: its id and the application field
/// name → Notion property name mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// Database id
    pub id: String,
    /// Application field name → Notion property name
    pub properties: BTreeMap<String, String>,
}

impl DatabaseSettings {
    /// Derive settings from a database schema.
    #[must_use]
    pub fn from_database(database: &Database) -> Self {
        Self {
            id: database.id.clone(),
            properties: properties_map(database),
        }
    }

    /// Notion property name for an application field.
    #[must_use]
    pub fn property_name(&self, field: &str) -> Option<&str> {
        self.properties.get(field).map(String::as_str)
    }

    /// Application field for a Notion property name.
    #[must_use]
    pub fn field_name(&self, property: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(_, p)| p.as_str() == property)
            .map(|(f, _)| f.as_str())
    }
}

/// Database name → settings.
pub type DatabasesMap = BTreeMap<String, DatabaseSettings>;

/// Build the settings map for a set of databases, keyed by [`database_name`].
pub fn settings_map(databases: &[Database]) -> NotionableResult<DatabasesMap> {
    let mut map = DatabasesMap::new();

    for database in databases {
        let name = database_name(database)?;
        if let Some(previous) = map.insert(name.clone(), DatabaseSettings::from_database(database))
        {
            warn!(
                name = %name,
                replaced = %previous.id,
                database_id = %database.id,
                "Two databases share a name; keeping the last one"
            );
        }
    }

    Ok(map)
}

/// Read a settings map previously written by [`save_settings`].
pub async fn load_settings(path: impl AsRef<Path>) -> NotionableResult<DatabasesMap> {
    let path = path.as_ref();
    let content =
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| NotionableError::FileRead {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

    let map: DatabasesMap = serde_json::from_str(&content)?;
    debug!(path = %path.display(), databases = map.len(), "Loaded database settings");
    Ok(map)
}

/// Write a settings map as pretty-printed JSON.
pub async fn save_settings(path: impl AsRef<Path>, map: &DatabasesMap) -> NotionableResult<()> {
    let path = path.as_ref();
    let write_error = |e: std::io::Error| NotionableError::FileWrite {
        path: path.display().to_string(),
        reason: e.to_string(),
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_error)?;
    }

    let content = serde_json::to_string_pretty(map)?;
    tokio::fs::write(path, content).await.map_err(write_error)?;
    debug!(path = %path.display(), databases = map.len(), "Saved database settings");
    Ok(())
}
