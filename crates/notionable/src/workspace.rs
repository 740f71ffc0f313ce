//! Workspace discovery: list databases, generate their types, hand out repositories.

use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::{info, instrument};

use crate::client::NotionClient;
use crate::config::NotionableOptions;
use crate::database::NotionDatabase;
use crate::error::{NotionableError, NotionableResult};
use crate::settings::{settings_map, DatabaseSettings, DatabasesMap};
use crate::typegen::generate_type_files;

/// Databases reachable with one integration token.
#[derive(Debug, Clone)]
pub struct NotionWorkspace {
    client: NotionClient,
    settings: DatabasesMap,
}

impl NotionWorkspace {
    /// Workspace over an existing client and settings map.
    #[must_use]
    pub fn new(client: NotionClient, settings: DatabasesMap) -> Self {
        Self { client, settings }
    }

    /// Connect with previously saved settings, without touching the API.
    pub fn connect(options: &NotionableOptions, settings: DatabasesMap) -> NotionableResult<Self> {
        Ok(Self::new(NotionClient::new(options)?, settings))
    }

    /// Settings of every known database, keyed by database name.
    #[must_use]
    pub fn settings(&self) -> &DatabasesMap {
        &self.settings
    }

    /// Names of the known databases.
    pub fn database_names(&self) -> impl Iterator<Item = &str> {
        self.settings.keys().map(String::as_str)
    }

    /// Repository for the database registered as `name`.
    pub fn database<Item: DeserializeOwned>(
        &self,
        name: &str,
    ) -> NotionableResult<NotionDatabase<Item>> {
        let settings: &DatabaseSettings =
            self.settings
                .get(name)
                .ok_or_else(|| NotionableError::DatabaseNotFound {
                    name: name.to_string(),
                })?;

        Ok(NotionDatabase::new(self.client.clone(), settings.clone()))
    }
}

/// List every database shared with the integration, write a type file per
/// database into `types_path`, and build the workspace settings.
#[instrument(skip_all)]
pub async fn fetch_workspace(
    options: &NotionableOptions,
    types_path: impl AsRef<Path>,
) -> NotionableResult<NotionWorkspace> {
    let types_path = types_path.as_ref();
    let client = NotionClient::new(options)?;
    let databases = client.list_databases().await?;

    let generated = generate_type_files(&databases, types_path).await?;
    let settings = settings_map(&databases)?;

    info!(
        databases = settings.len(),
        type_files = generated.len(),
        types_path = %types_path.display(),
        "Fetched Notion workspace"
    );

    Ok(NotionWorkspace::new(client, settings))
}
