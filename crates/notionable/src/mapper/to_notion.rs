//! Application item → Notion property payloads.

use serde::Serialize;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::{NotionableError, NotionableResult};
use crate::models::{CreatePageRequest, Database, DatabaseParent, PropertyKind};
use crate::values::DateRange;

/// Maximum length of a single rich text segment.
const MAX_TEXT_LENGTH: usize = 2000;

/// Build a page creation request for an item.
pub fn map_item_to_page<I: Serialize + ?Sized>(
    database: &Database,
    properties: &BTreeMap<String, String>,
    input: &I,
) -> NotionableResult<CreatePageRequest> {
    Ok(CreatePageRequest {
        parent: DatabaseParent {
            database_id: database.id.clone(),
        },
        properties: map_item_to_properties(database, properties, input)?,
    })
}

/// Property payloads for every mapped field present in `input`.
///
/// Fields missing from the serialized input are left untouched, so partial
/// inputs produce partial updates.
pub fn map_item_to_properties<I: Serialize + ?Sized>(
    database: &Database,
    properties: &BTreeMap<String, String>,
    input: &I,
) -> NotionableResult<Map<String, Value>> {
    let input = match serde_json::to_value(input)? {
        Value::Object(map) => map,
        other => {
            return Err(NotionableError::NotAnObject {
                found: json_type(&other),
            })
        }
    };

    let mut payload = Map::new();

    for (field, property) in properties {
        let Some(value) = input.get(field) else {
            continue;
        };

        let schema =
            database
                .properties
                .get(property)
                .ok_or_else(|| NotionableError::UnknownProperty {
                    database_id: database.id.clone(),
                    property: property.clone(),
                })?;

        if value.is_null() && !schema.kind.is_writable() {
            debug!(property = %property, kind = %schema.kind, "Skipping null read-only property");
            continue;
        }

        payload.insert(
            property.clone(),
            property_payload(property, schema.kind, value)?,
        );
    }

    Ok(payload)
}

/// Request payload for one property value.
pub fn property_payload(
    property: &str,
    kind: PropertyKind,
    value: &Value,
) -> NotionableResult<Value> {
    let invalid = |expected| NotionableError::InvalidValue {
        property: property.to_string(),
        expected,
    };

    let payload = match kind {
        PropertyKind::Title | PropertyKind::RichText => {
            let content = optional_str(value).ok_or_else(|| invalid("a string"))?;
            keyed(kind, Value::Array(rich_text(content)))
        }
        PropertyKind::Number => match value {
            Value::Null | Value::Number(_) => json!({ "number": value }),
            _ => return Err(invalid("a number")),
        },
        PropertyKind::Date => {
            if value.is_null() {
                json!({ "date": null })
            } else {
                let range = DateRange::from_input(value).ok_or_else(|| invalid("a date"))?;
                json!({ "date": range.to_notion() })
            }
        }
        PropertyKind::PhoneNumber | PropertyKind::Url | PropertyKind::Email => match value {
            Value::Null | Value::String(_) => keyed(kind, value.clone()),
            _ => return Err(invalid("a string")),
        },
        PropertyKind::Checkbox => match value {
            Value::Bool(checked) => json!({ "checkbox": checked }),
            _ => return Err(invalid("a boolean")),
        },
        PropertyKind::Select | PropertyKind::Status => match value {
            Value::Null => keyed(kind, Value::Null),
            Value::String(name) => keyed(kind, json!({ "name": name })),
            _ => return Err(invalid("a string")),
        },
        PropertyKind::MultiSelect => {
            let names = string_list(value).ok_or_else(|| invalid("a list of strings"))?;
            json!({
                "multi_select": names.iter().map(|name| json!({ "name": name })).collect::<Vec<_>>()
            })
        }
        PropertyKind::Relation => {
            let ids = string_list(value).ok_or_else(|| invalid("a list of page ids"))?;
            json!({
                "relation": ids.iter().map(|id| json!({ "id": id })).collect::<Vec<_>>()
            })
        }
        PropertyKind::People => {
            let ids = string_list(value).ok_or_else(|| invalid("a list of user ids"))?;
            json!({
                "people": ids
                    .iter()
                    .map(|id| json!({ "object": "user", "id": id }))
                    .collect::<Vec<_>>()
            })
        }
        PropertyKind::Files
        | PropertyKind::Formula
        | PropertyKind::Rollup
        | PropertyKind::CreatedTime
        | PropertyKind::CreatedBy
        | PropertyKind::LastEditedTime
        | PropertyKind::LastEditedBy
        | PropertyKind::Unsupported => {
            return Err(NotionableError::UnsupportedProperty {
                property: property.to_string(),
                kind: kind.to_string(),
            })
        }
    };

    Ok(payload)
}

/// `{ "<kind>": value }`
fn keyed(kind: PropertyKind, value: Value) -> Value {
    let mut payload = Map::new();
    payload.insert(kind.as_str().to_string(), value);
    Value::Object(payload)
}

/// Rich text segments for a string, split at Notion's segment length limit.
fn rich_text(content: &str) -> Vec<Value> {
    let chars: Vec<char> = content.chars().collect();
    chars
        .chunks(MAX_TEXT_LENGTH)
        .map(|chunk| {
            json!({
                "type": "text",
                "text": { "content": chunk.iter().collect::<String>() }
            })
        })
        .collect()
}

/// String value, with `null` read as empty.
fn optional_str(value: &Value) -> Option<&str> {
    match value {
        Value::Null => Some(""),
        Value::String(s) => Some(s),
        _ => None,
    }
}

/// List of strings, with `null` read as empty.
fn string_list(value: &Value) -> Option<Vec<&str>> {
    match value {
        Value::Null => Some(Vec::new()),
        Value::Array(items) => items.iter().map(Value::as_str).collect(),
        _ => None,
    }
}

const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn database() -> Database {
        serde_json::from_value(json!({
            "id": "db1",
            "title": [{"type": "text", "plain_text": "Tasks"}],
            "properties": {
                "Name": {"id": "title", "name": "Name", "type": "title"},
                "Notes": {"id": "a", "name": "Notes", "type": "rich_text"},
                "Done": {"id": "b", "name": "Done", "type": "checkbox"},
                "Due": {"id": "c", "name": "Due", "type": "date"},
                "Tags": {"id": "d", "name": "Tags", "type": "multi_select"},
                "Priority": {"id": "e", "name": "Priority", "type": "select"},
                "Created": {"id": "f", "name": "Created", "type": "created_time"},
                "Estimate": {"id": "g", "name": "Estimate", "type": "number"}
            }
        }))
        .unwrap()
    }

    fn properties() -> BTreeMap<String, String> {
        [
            ("name", "Name"),
            ("notes", "Notes"),
            ("done", "Done"),
            ("due", "Due"),
            ("tags", "Tags"),
            ("priority", "Priority"),
            ("created", "Created"),
            ("estimate", "Estimate"),
        ]
        .into_iter()
        .map(|(f, p)| (f.to_string(), p.to_string()))
        .collect()
    }

    #[test]
    fn test_map_item_to_page() {
        let input = json!({
            "name": "Write docs",
            "done": false,
            "tags": ["docs", "urgent"],
            "priority": "High",
            "estimate": 2.5
        });

        let request = map_item_to_page(&database(), &properties(), &input).unwrap();
        assert_eq!(request.parent.database_id, "db1");

        let props = request.properties;
        assert_eq!(props.len(), 5);
        assert_eq!(
            props["Name"],
            json!({"title": [{"type": "text", "text": {"content": "Write docs"}}]})
        );
        assert_eq!(props["Done"], json!({"checkbox": false}));
        assert_eq!(
            props["Tags"],
            json!({"multi_select": [{"name": "docs"}, {"name": "urgent"}]})
        );
        assert_eq!(props["Priority"], json!({"select": {"name": "High"}}));
        assert_eq!(props["Estimate"], json!({"number": 2.5}));
    }

    #[test]
    fn test_partial_input_only_touches_present_fields() {
        let props = map_item_to_properties(&database(), &properties(), &json!({"done": true}))
            .unwrap();
        assert_eq!(props.len(), 1);
        assert_eq!(props["Done"], json!({"checkbox": true}));
    }

    #[test]
    fn test_date_payload() {
        let due = DateRange::between(
            Utc.with_ymd_and_hms(2021, 5, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2021, 5, 2, 9, 30, 0).unwrap(),
        );
        let props =
            map_item_to_properties(&database(), &properties(), &json!({ "due": due })).unwrap();
        assert_eq!(
            props["Due"],
            json!({"date": {"start": "2021-05-01", "end": "2021-05-02T09:30:00+00:00"}})
        );
    }

    #[test]
    fn test_date_object_with_bare_dates() {
        let props = map_item_to_properties(
            &database(),
            &properties(),
            &json!({"due": {"start": "2021-05-01", "end": "2021-05-03"}}),
        )
        .unwrap();
        assert_eq!(
            props["Due"],
            json!({"date": {"start": "2021-05-01", "end": "2021-05-03"}})
        );
    }

    #[test]
    fn test_null_clears_nullable_properties() {
        let props = map_item_to_properties(
            &database(),
            &properties(),
            &json!({"due": null, "priority": null, "notes": null, "tags": null}),
        )
        .unwrap();
        assert_eq!(props["Due"], json!({"date": null}));
        assert_eq!(props["Priority"], json!({"select": null}));
        assert_eq!(props["Notes"], json!({"rich_text": []}));
        assert_eq!(props["Tags"], json!({"multi_select": []}));
    }

    #[test]
    fn test_read_only_property_rejected() {
        let result = map_item_to_properties(
            &database(),
            &properties(),
            &json!({"created": "2021-05-01T00:00:00Z"}),
        );
        assert!(matches!(
            result,
            Err(NotionableError::UnsupportedProperty { ref kind, .. }) if kind == "created_time"
        ));
    }

    #[test]
    fn test_null_read_only_property_skipped() {
        let props =
            map_item_to_properties(&database(), &properties(), &json!({"created": null})).unwrap();
        assert!(props.is_empty());
    }

    #[test]
    fn test_wrong_value_shape_rejected() {
        let result =
            map_item_to_properties(&database(), &properties(), &json!({"done": "yes"}));
        assert!(matches!(
            result,
            Err(NotionableError::InvalidValue { expected: "a boolean", .. })
        ));
    }

    #[test]
    fn test_unknown_property_rejected() {
        let mut mapping = properties();
        mapping.insert("owner".to_string(), "Owner".to_string());

        let result = map_item_to_properties(&database(), &mapping, &json!({"owner": "u1"}));
        assert!(matches!(result, Err(NotionableError::UnknownProperty { .. })));
    }

    #[test]
    fn test_non_object_input_rejected() {
        let result = map_item_to_properties(&database(), &properties(), &json!(["a"]));
        assert!(matches!(
            result,
            Err(NotionableError::NotAnObject { found: "an array" })
        ));
    }

    #[test]
    fn test_long_text_is_split() {
        let long = "x".repeat(MAX_TEXT_LENGTH + 10);
        let segments = rich_text(&long);
        assert_eq!(segments.len(), 2);
        assert_eq!(
            segments[1]["text"]["content"].as_str().unwrap().len(),
            10
        );
        assert!(rich_text("").is_empty());
    }

    #[test]
    fn test_people_and_relation_payloads() {
        assert_eq!(
            property_payload("Owner", PropertyKind::People, &json!(["u1"])).unwrap(),
            json!({"people": [{"object": "user", "id": "u1"}]})
        );
        assert_eq!(
            property_payload("Parent", PropertyKind::Relation, &json!(["p1"])).unwrap(),
            json!({"relation": [{"id": "p1"}]})
        );
        assert_eq!(
            property_payload("State", PropertyKind::Status, &json!("Done")).unwrap(),
            json!({"status": {"name": "Done"}})
        );
    }
}
