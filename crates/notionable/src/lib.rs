//! Typed access to Notion databases.
//!
//! This crate provides:
//! - REST client for the Notion API
//! - Property mapping between Notion pages and application records
//! - Repository-style CRUD over a single database
//! - Rust type generation from database schemas
//!
//! # Example
//!
//! ```no_run
//! use notionable::{fetch_workspace, FindQuery, NotionableOptions};
//! use serde::Deserialize;
//! use serde_json::json;
//!
//! #[derive(Debug, Deserialize)]
//! struct Task {
//!     id: String,
//!     name: String,
//!     done: bool,
//! }
//!
//! # async fn example() -> notionable::NotionableResult<()> {
//! let options = NotionableOptions::new("secret_...");
//! let workspace = fetch_workspace(&options, "src/notion_types").await?;
//! let tasks = workspace.database::<Task>("tasks")?;
//!
//! let created = tasks.create(&json!({ "name": "Write docs", "done": false })).await?;
//! tasks.update_by_id(&created.id, &json!({ "done": true })).await?;
//!
//! let open = tasks
//!     .find(&FindQuery::new().filter(json!({
//!         "property": "Done",
//!         "checkbox": { "equals": false }
//!     })))
//!     .await?;
//! println!("{} open tasks", open.len());
//! # Ok(())
//! # }
//! ```

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)] // Every API call can fail

pub mod client;
pub mod config;
pub mod database;
pub mod error;
pub mod mapper;
pub mod models;
pub mod naming;
pub mod settings;
pub mod typegen;
pub mod values;
pub mod workspace;

pub use client::NotionClient;
pub use config::{Config, NotionableOptions};
pub use database::NotionDatabase;
pub use error::{NotionableError, NotionableResult};
pub use models::{Database, FindQuery, Page, PropertyKind, PropertyValue};
pub use settings::{load_settings, save_settings, DatabaseSettings, DatabasesMap};
pub use typegen::{generate_type_file, generate_type_files, GeneratedType};
pub use values::{DateRange, FileRef, FormulaResult};
pub use workspace::{fetch_workspace, NotionWorkspace};
