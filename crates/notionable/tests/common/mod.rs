//! Shared fixtures for Notion API integration tests.

#![allow(dead_code)]

use notionable::{NotionClient, NotionableOptions};
use serde_json::{json, Value};
use wiremock::MockServer;

pub const DATABASE_ID: &str = "d9824bdc-8445-4327-be8b-5b47500af6ce";
pub const TOKEN: &str = "secret_test";

/// Options pointing at a mock server.
pub fn options(server: &MockServer) -> NotionableOptions {
    NotionableOptions::new(TOKEN).with_api_url(server.uri())
}

/// Client pointing at a mock server.
pub fn client(server: &MockServer) -> NotionClient {
    NotionClient::new(&options(server)).expect("client should build")
}

/// Database object for a "Tasks" database.
pub fn tasks_database() -> Value {
    json!({
        "object": "database",
        "id": DATABASE_ID,
        "title": [{"type": "text", "text": {"content": "Tasks"}, "plain_text": "Tasks"}],
        "properties": {
            "Name": {"id": "title", "name": "Name", "type": "title", "title": {}},
            "Done": {"id": "a%3Ab", "name": "Done", "type": "checkbox", "checkbox": {}},
            "Due Date": {"id": "c%3Ad", "name": "Due Date", "type": "date", "date": {}},
            "Tags": {"id": "e%3Af", "name": "Tags", "type": "multi_select", "multi_select": {"options": []}},
            "Created": {"id": "g%3Ah", "name": "Created", "type": "created_time", "created_time": {}}
        }
    })
}

/// Database object for a "Reading List" database.
pub fn reading_list_database() -> Value {
    json!({
        "object": "database",
        "id": "0b5b5e3c-1111-2222-3333-444455556666",
        "title": [{"type": "text", "plain_text": "Reading List"}],
        "properties": {
            "Title": {"id": "title", "name": "Title", "type": "title"},
            "Rating": {"id": "r", "name": "Rating", "type": "number"}
        }
    })
}

/// Page row of the tasks database.
pub fn task_page(id: &str, name: &str, done: bool) -> Value {
    json!({
        "object": "page",
        "id": id,
        "parent": {"type": "database_id", "database_id": DATABASE_ID},
        "archived": false,
        "created_time": "2021-05-01T10:00:00.000Z",
        "last_edited_time": "2021-05-01T10:00:00.000Z",
        "properties": {
            "Name": {"id": "title", "type": "title", "title": [{"type": "text", "plain_text": name}]},
            "Done": {"id": "a%3Ab", "type": "checkbox", "checkbox": done},
            "Due Date": {"id": "c%3Ad", "type": "date", "date": {"start": "2021-05-03", "end": null}},
            "Tags": {"id": "e%3Af", "type": "multi_select", "multi_select": [{"name": "docs"}]},
            "Created": {"id": "g%3Ah", "type": "created_time", "created_time": "2021-05-01T10:00:00.000Z"}
        }
    })
}

/// Query response wrapping the given pages.
pub fn query_response(pages: Vec<Value>) -> Value {
    json!({
        "object": "list",
        "results": pages,
        "next_cursor": null,
        "has_more": false
    })
}

/// Error body as Notion returns it.
pub fn error_body(status: u16, code: &str, message: &str) -> Value {
    json!({
        "object": "error",
        "status": status,
        "code": code,
        "message": message
    })
}
