//! Typed repository over a single Notion database.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use tracing::{debug, info, instrument};

use crate::client::NotionClient;
use crate::error::NotionableResult;
use crate::mapper::{map_item_to_page, map_item_to_properties, map_page_to_item};
use crate::models::{Database, FindQuery, Page, UpdatePageRequest};
use crate::settings::DatabaseSettings;

/// Repository of `Item`s stored as pages of one database.
///
/// Writes accept any serializable input; only fields named in the settings
/// mapping are sent, so partial inputs update only what they contain.
#[derive(Debug)]
pub struct NotionDatabase<Item> {
    client: NotionClient,
    settings: DatabaseSettings,
    _item: PhantomData<fn() -> Item>,
}

impl<Item> Clone for NotionDatabase<Item> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            settings: self.settings.clone(),
            _item: PhantomData,
        }
    }
}

impl<Item: DeserializeOwned> NotionDatabase<Item> {
    /// Create a repository for the database described by `settings`.
    #[must_use]
    pub fn new(client: NotionClient, settings: DatabaseSettings) -> Self {
        Self {
            client,
            settings,
            _item: PhantomData,
        }
    }

    /// Settings this repository maps with.
    #[must_use]
    pub fn settings(&self) -> &DatabaseSettings {
        &self.settings
    }

    // =========================================================================
    // Create
    // =========================================================================

    /// Create a page from `input` and return the stored item.
    #[instrument(skip(self, input), fields(database_id = %self.settings.id))]
    pub async fn create<I: Serialize + ?Sized>(&self, input: &I) -> NotionableResult<Item> {
        let database = self.schema().await?;
        self.create_with(&database, input).await
    }

    /// Create one page per input, in order. Stops at the first failure.
    #[instrument(skip(self, inputs), fields(database_id = %self.settings.id, count = inputs.len()))]
    pub async fn bulk_create<I: Serialize>(&self, inputs: &[I]) -> NotionableResult<Vec<Item>> {
        let database = self.schema().await?;
        let mut created = Vec::with_capacity(inputs.len());

        for input in inputs {
            created.push(self.create_with(&database, input).await?);
        }

        info!(count = created.len(), "Created pages");
        Ok(created)
    }

    async fn create_with<I: Serialize + ?Sized>(
        &self,
        database: &Database,
        input: &I,
    ) -> NotionableResult<Item> {
        let request = map_item_to_page(database, &self.settings.properties, input)?;
        let page = self.client.create_page(&request).await?;
        map_page_to_item(&page, &self.settings.properties)
    }

    // =========================================================================
    // Read
    // =========================================================================

    /// Items matching `query` (first page of results only).
    #[instrument(skip(self, query), fields(database_id = %self.settings.id))]
    pub async fn find(&self, query: &FindQuery) -> NotionableResult<Vec<Item>> {
        self.find_pages(query)
            .await?
            .iter()
            .map(|page| map_page_to_item(page, &self.settings.properties))
            .collect()
    }

    /// First item matching `query`.
    #[instrument(skip(self, query), fields(database_id = %self.settings.id))]
    pub async fn find_one(&self, query: &FindQuery) -> NotionableResult<Option<Item>> {
        self.find_first_page(query)
            .await?
            .map(|page| map_page_to_item(&page, &self.settings.properties))
            .transpose()
    }

    /// Item with the given page id, or `None` if it doesn't exist or belongs
    /// to another database.
    #[instrument(skip(self), fields(database_id = %self.settings.id))]
    pub async fn find_by_id(&self, id: &str) -> NotionableResult<Option<Item>> {
        let page = match self.client.retrieve_page(id).await {
            Ok(page) => page,
            Err(e) if e.is_not_found() => {
                debug!(page_id = %id, "Page not found");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        if !page.belongs_to(&self.settings.id) {
            debug!(page_id = %id, "Page belongs to another parent");
            return Ok(None);
        }

        map_page_to_item(&page, &self.settings.properties).map(Some)
    }

    // =========================================================================
    // Update
    // =========================================================================

    /// Update the page with the given id, un-archiving it.
    #[instrument(skip(self, input), fields(database_id = %self.settings.id))]
    pub async fn update_by_id<I: Serialize + ?Sized>(
        &self,
        id: &str,
        input: &I,
    ) -> NotionableResult<Item> {
        let request = self.update_request(input).await?;
        self.update_with(id, &request).await
    }

    /// Update the first page matching `query`. `None` when nothing matched.
    #[instrument(skip(self, query, input), fields(database_id = %self.settings.id))]
    pub async fn update_one<I: Serialize + ?Sized>(
        &self,
        query: &FindQuery,
        input: &I,
    ) -> NotionableResult<Option<Item>> {
        let Some(page) = self.find_first_page(query).await? else {
            debug!("No page matched; nothing to update");
            return Ok(None);
        };

        self.update_by_id(&page.id, input).await.map(Some)
    }

    /// Apply the same update to every page matching `query`, in order.
    #[instrument(skip(self, query, input), fields(database_id = %self.settings.id))]
    pub async fn bulk_update<I: Serialize + ?Sized>(
        &self,
        query: &FindQuery,
        input: &I,
    ) -> NotionableResult<Vec<Item>> {
        let pages = self.find_pages(query).await?;
        if pages.is_empty() {
            return Ok(Vec::new());
        }

        let request = self.update_request(input).await?;
        let mut updated = Vec::with_capacity(pages.len());
        for page in &pages {
            updated.push(self.update_with(&page.id, &request).await?);
        }

        info!(count = updated.len(), "Updated pages");
        Ok(updated)
    }

    async fn update_request<I: Serialize + ?Sized>(
        &self,
        input: &I,
    ) -> NotionableResult<UpdatePageRequest> {
        let database = self.schema().await?;
        Ok(UpdatePageRequest {
            properties: map_item_to_properties(&database, &self.settings.properties, input)?,
            archived: Some(false),
        })
    }

    async fn update_with(&self, id: &str, request: &UpdatePageRequest) -> NotionableResult<Item> {
        let page = self.client.update_page(id, request).await?;
        map_page_to_item(&page, &self.settings.properties)
    }

    // =========================================================================
    // Delete
    // =========================================================================

    /// Archive the page with the given id. Returns whether Notion reports it archived.
    #[instrument(skip(self), fields(database_id = %self.settings.id))]
    pub async fn delete_by_id(&self, id: &str) -> NotionableResult<bool> {
        let request = UpdatePageRequest {
            archived: Some(true),
            ..UpdatePageRequest::default()
        };
        let page = self.client.update_page(id, &request).await?;
        Ok(page.archived)
    }

    /// Archive the first page matching `query`. `false` when nothing matched.
    #[instrument(skip(self, query), fields(database_id = %self.settings.id))]
    pub async fn delete_one(&self, query: &FindQuery) -> NotionableResult<bool> {
        match self.find_first_page(query).await? {
            Some(page) => self.delete_by_id(&page.id).await,
            None => Ok(false),
        }
    }

    /// Archive every page matching `query`. Returns how many were archived.
    #[instrument(skip(self, query), fields(database_id = %self.settings.id))]
    pub async fn bulk_delete(&self, query: &FindQuery) -> NotionableResult<usize> {
        let pages = self.find_pages(query).await?;
        let mut archived = 0;

        for page in &pages {
            if self.delete_by_id(&page.id).await? {
                archived += 1;
            }
        }

        info!(archived, matched = pages.len(), "Archived pages");
        Ok(archived)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn schema(&self) -> NotionableResult<Database> {
        self.client.retrieve_database(&self.settings.id).await
    }

    async fn find_pages(&self, query: &FindQuery) -> NotionableResult<Vec<Page>> {
        Ok(self
            .client
            .query_database(&self.settings.id, query)
            .await?
            .results)
    }

    async fn find_first_page(&self, query: &FindQuery) -> NotionableResult<Option<Page>> {
        let query = query.clone().page_size(1);
        Ok(self.find_pages(&query).await?.into_iter().next())
    }
}
