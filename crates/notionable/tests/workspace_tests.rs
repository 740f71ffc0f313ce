//! Integration tests for workspace discovery and type generation.

mod common;

use common::{options, reading_list_database, tasks_database, DATABASE_ID};
use notionable::{fetch_workspace, load_settings, save_settings, NotionableError};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_search(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "results": [tasks_database(), reading_list_database()],
            "next_cursor": null,
            "has_more": false
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_fetch_workspace_writes_type_files() {
    let server = MockServer::start().await;
    mount_search(&server).await;
    let dir = TempDir::new().unwrap();

    fetch_workspace(&options(&server), dir.path()).await.unwrap();

    let task = std::fs::read_to_string(dir.path().join("task.rs")).unwrap();
    assert!(task.contains("pub struct Task {"));
    assert!(task.contains("pub struct TaskInput {"));
    assert!(task.contains("pub due_date: Option<DateRange>,"));

    let reading = std::fs::read_to_string(dir.path().join("reading_list.rs")).unwrap();
    assert!(reading.contains("pub struct ReadingList {"));

    let index = std::fs::read_to_string(dir.path().join("mod.rs")).unwrap();
    assert!(index.contains("pub mod reading_list;"));
    assert!(index.contains("pub mod task;"));
}

#[tokio::test]
async fn test_fetch_workspace_builds_settings() {
    let server = MockServer::start().await;
    mount_search(&server).await;
    let dir = TempDir::new().unwrap();

    let workspace = fetch_workspace(&options(&server), dir.path()).await.unwrap();

    let names: Vec<&str> = workspace.database_names().collect();
    assert_eq!(names, vec!["reading list", "tasks"]);

    let tasks = &workspace.settings()["tasks"];
    assert_eq!(tasks.id, DATABASE_ID);
    assert_eq!(tasks.property_name("due_date"), Some("Due Date"));
    assert_eq!(tasks.field_name("Due Date"), Some("due_date"));

    let repository = workspace.database::<serde_json::Value>("tasks").unwrap();
    assert_eq!(repository.settings().id, DATABASE_ID);
}

#[tokio::test]
async fn test_fetch_workspace_with_non_ascii_title() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "results": [
                tasks_database(),
                {
                    "object": "database",
                    "id": "db-ru",
                    "title": [{"type": "text", "plain_text": "Задачи"}],
                    "properties": {
                        "Название": {"id": "title", "name": "Название", "type": "title"}
                    }
                }
            ],
            "next_cursor": null,
            "has_more": false
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let workspace = fetch_workspace(&options(&server), dir.path()).await.unwrap();

    assert_eq!(workspace.settings()["задачи"].id, "db-ru");
    assert!(dir.path().join("task.rs").exists());

    let source = std::fs::read_to_string(dir.path().join("database_dbru.rs")).unwrap();
    assert!(source.contains("pub struct Задачи {"));
    assert!(source.contains("pub property_title: String,"));

    let index = std::fs::read_to_string(dir.path().join("mod.rs")).unwrap();
    assert!(index.contains("pub mod database_dbru;"));
    assert!(index.contains("pub use database_dbru::{Задачи, ЗадачиInput};"));
}

#[tokio::test]
async fn test_missing_database_is_reported() {
    let server = MockServer::start().await;
    mount_search(&server).await;
    let dir = TempDir::new().unwrap();

    let workspace = fetch_workspace(&options(&server), dir.path()).await.unwrap();
    let err = workspace.database::<serde_json::Value>("missing").unwrap_err();

    assert!(matches!(err, NotionableError::DatabaseNotFound { .. }));
    assert!(err.to_string().contains("missing"));
}

#[tokio::test]
async fn test_settings_survive_save_and_load() {
    let server = MockServer::start().await;
    mount_search(&server).await;
    let dir = TempDir::new().unwrap();

    let workspace = fetch_workspace(&options(&server), dir.path().join("types"))
        .await
        .unwrap();

    let settings_path = dir.path().join("config").join("notion.json");
    save_settings(&settings_path, workspace.settings())
        .await
        .unwrap();

    let loaded = load_settings(&settings_path).await.unwrap();
    assert_eq!(&loaded, workspace.settings());
}

#[tokio::test]
async fn test_fetch_workspace_propagates_api_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "object": "error",
            "status": 401,
            "code": "unauthorized",
            "message": "API token is invalid."
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let result = fetch_workspace(&options(&server), dir.path()).await;

    assert!(matches!(
        result,
        Err(NotionableError::Api { status: 401, .. })
    ));
    assert!(!dir.path().join("mod.rs").exists());
}
