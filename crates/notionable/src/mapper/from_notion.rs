//! Notion page → application item.

use serde::de::DeserializeOwned;
use serde_json::{Map, Number, Value};
use std::collections::{BTreeMap, HashMap};
use tracing::trace;

use crate::error::NotionableResult;
use crate::models::{plain_text, DateValue, FormulaValue, Page, PropertyValue, RollupValue};
use crate::values::{DateRange, FileRef};

/// Map a page into an item using the field → property mapping.
pub fn map_page_to_item<Item: DeserializeOwned>(
    page: &Page,
    properties: &BTreeMap<String, String>,
) -> NotionableResult<Item> {
    let fields = page_to_fields(page, properties);
    Ok(serde_json::from_value(Value::Object(fields))?)
}

/// Plain JSON object `{ id, <field>: <value>, ... }` for a page.
///
/// Properties without a mapped field are skipped.
#[must_use]
pub fn page_to_fields(page: &Page, properties: &BTreeMap<String, String>) -> Map<String, Value> {
    let field_names: HashMap<&str, &str> = properties
        .iter()
        .map(|(field, property)| (property.as_str(), field.as_str()))
        .collect();

    let mut fields = Map::new();
    fields.insert("id".to_string(), Value::String(page.id.clone()));

    for (property, value) in &page.properties {
        match field_names.get(property.as_str()) {
            Some(field) => {
                fields.insert((*field).to_string(), plain_value(value));
            }
            None => trace!(property = %property, "Skipping unmapped property"),
        }
    }

    fields
}

/// Plain value of a single property. Unsupported types map to `null`.
#[must_use]
pub fn plain_value(value: &PropertyValue) -> Value {
    match value {
        PropertyValue::Title { title } => Value::String(plain_text(title)),
        PropertyValue::RichText { rich_text } => Value::String(plain_text(rich_text)),
        PropertyValue::Number { number } => number_value(*number),
        PropertyValue::Select { select } | PropertyValue::Status { status: select } => select
            .as_ref()
            .map_or(Value::Null, |option| Value::String(option.name.clone())),
        PropertyValue::MultiSelect { multi_select } => multi_select
            .iter()
            .map(|option| Value::String(option.name.clone()))
            .collect(),
        PropertyValue::Date { date } => date_value(date.as_ref()),
        PropertyValue::Relation { relation } => relation
            .iter()
            .map(|page| Value::String(page.id.clone()))
            .collect(),
        PropertyValue::People { people } => people
            .iter()
            .map(|user| Value::String(user.id.clone()))
            .collect(),
        PropertyValue::Checkbox { checkbox } => Value::Bool(*checkbox),
        PropertyValue::Url { url: text }
        | PropertyValue::Email { email: text }
        | PropertyValue::PhoneNumber { phone_number: text } => {
            text.clone().map_or(Value::Null, Value::String)
        }
        PropertyValue::CreatedBy { created_by: user }
        | PropertyValue::LastEditedBy {
            last_edited_by: user,
        } => Value::String(user.id.clone()),
        PropertyValue::CreatedTime { created_time: time }
        | PropertyValue::LastEditedTime {
            last_edited_time: time,
        } => serde_json::to_value(time).unwrap_or(Value::Null),
        PropertyValue::Files { files } => files
            .iter()
            .map(|file| serde_json::to_value(FileRef::from(file)).unwrap_or(Value::Null))
            .collect(),
        PropertyValue::Formula { formula } => formula_value(formula),
        PropertyValue::Rollup { rollup } => rollup_value(rollup),
        PropertyValue::Unsupported => {
            trace!("Unsupported property type mapped to null");
            Value::Null
        }
    }
}

fn number_value(number: Option<f64>) -> Value {
    number
        .and_then(Number::from_f64)
        .map_or(Value::Null, Value::Number)
}

fn date_value(date: Option<&DateValue>) -> Value {
    date.and_then(DateRange::from_notion)
        .and_then(|range| serde_json::to_value(range).ok())
        .unwrap_or(Value::Null)
}

fn formula_value(formula: &FormulaValue) -> Value {
    match formula {
        FormulaValue::String { string } => string.clone().map_or(Value::Null, Value::String),
        FormulaValue::Number { number } => number_value(*number),
        FormulaValue::Boolean { boolean } => boolean.map_or(Value::Null, Value::Bool),
        FormulaValue::Date { date } => date_value(date.as_ref()),
    }
}

fn rollup_value(rollup: &RollupValue) -> Value {
    match rollup {
        RollupValue::Number { number } => number_value(*number),
        RollupValue::Date { date } => date_value(date.as_ref()),
        RollupValue::Array { array } => array.iter().map(plain_value).collect(),
        RollupValue::Unsupported => Value::Null,
    }
}
