//! REST client for the Notion API.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, instrument, warn};

use crate::config::NotionableOptions;
use crate::error::{NotionableError, NotionableResult};
use crate::models::{
    ApiErrorBody, CreatePageRequest, Database, FindQuery, Page, QueryResponse, SearchResponse,
    UpdatePageRequest,
};

/// Largest page size Notion accepts.
const MAX_PAGE_SIZE: u32 = 100;

/// Notion REST client
#[derive(Debug, Clone)]
pub struct NotionClient {
    client: reqwest::Client,
    api_url: String,
}

impl NotionClient {
    /// Create a new Notion client.
    ///
    /// # Errors
    /// Returns error if the token is not a valid header value or the HTTP
    /// client cannot be built
    pub fn new(options: &NotionableOptions) -> NotionableResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", options.auth))
                .map_err(|_| NotionableError::InvalidToken)?,
        );
        headers.insert(
            "notion-version",
            HeaderValue::from_str(&options.notion_version).map_err(|_| {
                NotionableError::InvalidNotionVersion {
                    version: options.notion_version.clone(),
                }
            })?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            api_url: options.api_url.trim_end_matches('/').to_string(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}/{path}", self.api_url))
    }

    /// Send a request and decode the JSON body
    async fn send<R: DeserializeOwned>(&self, request: RequestBuilder) -> NotionableResult<R> {
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let error = serde_json::from_str::<ApiErrorBody>(&body).unwrap_or_else(|_| {
                ApiErrorBody {
                    code: "unknown".to_string(),
                    message: body.clone(),
                }
            });
            return Err(NotionableError::Api {
                status: status.as_u16(),
                code: error.code,
                message: error.message,
            });
        }

        Ok(response.json().await?)
    }

    async fn send_json<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> NotionableResult<R> {
        self.send(self.request(method, path).json(body)).await
    }

    // =========================================================================
    // Database Operations
    // =========================================================================

    /// Retrieve a database and its property schema
    #[instrument(skip(self), fields(database_id = %database_id))]
    pub async fn retrieve_database(&self, database_id: &str) -> NotionableResult<Database> {
        let database: Database = self
            .send(self.request(Method::GET, &format!("databases/{database_id}")))
            .await?;
        debug!(properties = database.properties.len(), "Retrieved database");
        Ok(database)
    }

    /// Query the pages of a database. Only the first page of results is returned.
    #[instrument(skip(self, query), fields(database_id = %database_id))]
    pub async fn query_database(
        &self,
        database_id: &str,
        query: &FindQuery,
    ) -> NotionableResult<QueryResponse> {
        let response: QueryResponse = self
            .send_json(
                Method::POST,
                &format!("databases/{database_id}/query"),
                query,
            )
            .await?;
        debug!(
            results = response.results.len(),
            has_more = response.has_more,
            "Queried database"
        );
        Ok(response)
    }

    /// List the databases shared with the integration
    #[instrument(skip(self))]
    pub async fn list_databases(&self) -> NotionableResult<Vec<Database>> {
        let body = json!({
            "filter": { "property": "object", "value": "database" },
            "page_size": MAX_PAGE_SIZE,
        });

        let response: SearchResponse = self.send_json(Method::POST, "search", &body).await?;
        if response.has_more {
            warn!(
                returned = response.results.len(),
                "More databases are shared than fit in one page; the rest are ignored"
            );
        }
        debug!(count = response.results.len(), "Listed databases");
        Ok(response.results)
    }

    // =========================================================================
    // Page Operations
    // =========================================================================

    /// Create a page in a database
    #[instrument(skip(self, request), fields(database_id = %request.parent.database_id))]
    pub async fn create_page(&self, request: &CreatePageRequest) -> NotionableResult<Page> {
        let page: Page = self.send_json(Method::POST, "pages", request).await?;
        debug!(page_id = %page.id, "Created page");
        Ok(page)
    }

    /// Retrieve a page
    #[instrument(skip(self), fields(page_id = %page_id))]
    pub async fn retrieve_page(&self, page_id: &str) -> NotionableResult<Page> {
        self.send(self.request(Method::GET, &format!("pages/{page_id}")))
            .await
    }

    /// Update page properties and/or archive state
    #[instrument(skip(self, request), fields(page_id = %page_id, archived = ?request.archived))]
    pub async fn update_page(
        &self,
        page_id: &str,
        request: &UpdatePageRequest,
    ) -> NotionableResult<Page> {
        self.send_json(Method::PATCH, &format!("pages/{page_id}"), request)
            .await
    }
}
