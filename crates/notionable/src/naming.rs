//! Name normalization shared by the type generator and the settings map.

use crate::error::{NotionableError, NotionableResult};
use crate::models::Database;

/// Split a name into words on punctuation, whitespace and case changes.
///
/// `"Due Date"`, `"due_date"` and `"dueDate"` all yield `["Due"/"due", "Date"/"date"]`;
/// acronyms stay together (`"HTTPStatus"` → `["HTTP", "Status"]`).
#[must_use]
pub fn words(input: &str) -> Vec<String> {
    let chars: Vec<char> = input.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_numeric() || (prev.is_uppercase() && next_is_lower)
            {
                words.push(std::mem::take(&mut current));
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current);
    }

    words
}

/// Lowercase words separated by spaces (`"My Tasks"` → `"my tasks"`).
#[must_use]
pub fn lower_case(input: &str) -> String {
    words(input)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// `UpperCamelCase` (`"my tasks"` → `"MyTasks"`).
#[must_use]
pub fn upper_camel_case(input: &str) -> String {
    words(input)
        .iter()
        .map(|w| {
            let lower = w.to_lowercase();
            let mut chars = lower.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect()
}

/// `snake_case` (`"Due Date"` → `"due_date"`).
#[must_use]
pub fn snake_case(input: &str) -> String {
    words(input)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// Drop every non-ASCII character.
#[must_use]
pub fn strip_non_ascii(input: &str) -> String {
    input.chars().filter(char::is_ascii).collect()
}

/// Name a database is registered under in a workspace: its title in lower case words.
pub fn database_name(database: &Database) -> NotionableResult<String> {
    database
        .title_text()
        .map(|title| lower_case(title.trim()))
        .ok_or_else(|| NotionableError::UnsupportedTitle {
            database_id: database.id.clone(),
        })
}
