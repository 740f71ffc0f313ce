//! Translation between Notion property payloads and application values.

pub mod from_notion;
pub mod to_notion;

pub use from_notion::{map_page_to_item, page_to_fields, plain_value};
pub use to_notion::{map_item_to_page, map_item_to_properties, property_payload};
