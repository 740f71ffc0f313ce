//! Rust type generation from database schemas.
//!
//! Every database gets one module holding a record struct (what reads return)
//! and an input struct with the writable fields as options (what creates and
//! partial updates take). Field names come from [`fields`], which also feeds
//! [`properties_map`], so generated types and settings always agree.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

use crate::error::{NotionableError, NotionableResult};
use crate::models::{Database, PropertyKind};
use crate::naming::{database_name, snake_case, strip_non_ascii, upper_camel_case};

/// Rust keywords usable as raw identifiers.
const RAW_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized",
    "use", "virtual", "where", "while", "yield",
];

/// Keywords that cannot be raw identifiers.
const RESERVED_KEYWORDS: &[&str] = &["crate", "self", "super", "Self"];

/// A database property as it appears in generated code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// Application field name (also the serde key)
    pub field: String,
    /// Notion property name
    pub property: String,
    /// Notion property type
    pub kind: PropertyKind,
}

impl FieldSpec {
    /// Identifier used in generated source.
    #[must_use]
    pub fn ident(&self) -> String {
        if RAW_KEYWORDS.contains(&self.field.as_str()) {
            format!("r#{}", self.field)
        } else {
            self.field.clone()
        }
    }
}

/// Result of writing a type file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedType {
    /// Record struct name
    pub type_name: String,
    /// Module (file stem) name
    pub module: String,
    /// Path of the written file
    pub path: PathBuf,
}

/// Record type name for a database: singularized `UpperCamelCase` title.
///
/// Non-ASCII letters are kept; Rust accepts Unicode identifiers.
pub fn type_name(database: &Database) -> NotionableResult<String> {
    let title = database_name(database)?;
    let mut name = upper_camel_case(&title);

    if name.is_empty() {
        return Err(NotionableError::UnsupportedTitle {
            database_id: database.id.clone(),
        });
    }

    if name.chars().count() > 1 && name.ends_with('s') {
        name.pop();
    }

    if !name.starts_with(char::is_alphabetic) {
        name.insert(0, '_');
    }

    if RESERVED_KEYWORDS.contains(&name.as_str()) {
        name.push('_');
    }

    Ok(name)
}

/// Module (file stem) name for a generated type.
///
/// `mod` declarations only accept ASCII names, so non-ASCII letters are
/// dropped and a title with none left falls back to `database_<id>`.
#[must_use]
pub fn module_name(type_name: &str, database_id: &str) -> String {
    let mut module = snake_case(&strip_non_ascii(type_name));

    if module.is_empty() {
        let id: String = database_id
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_lowercase())
            .collect();
        module = format!("database_{id}");
    }

    if module.starts_with(|c: char| c.is_ascii_digit()) {
        module.insert(0, '_');
    }

    if RESERVED_KEYWORDS.contains(&module.as_str()) || RAW_KEYWORDS.contains(&module.as_str()) {
        module.push('_');
    }

    module
}

/// Application field name for a single property, before de-duplication.
#[must_use]
pub fn field_name(property_name: &str, property_id: &str) -> String {
    let mut name = snake_case(&strip_non_ascii(property_name));

    if name.is_empty() {
        let id: String = property_id
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_lowercase())
            .collect();
        name = if id.is_empty() {
            "property".to_string()
        } else {
            format!("property_{id}")
        };
    }

    if name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }

    if RESERVED_KEYWORDS.contains(&name.as_str()) {
        name.push('_');
    }

    name
}

/// Every property of a database with its unique application field name.
///
/// `id` is reserved for the page id; clashing names get a numeric suffix in
/// property-name order.
#[must_use]
pub fn fields(database: &Database) -> Vec<FieldSpec> {
    let mut taken: BTreeSet<String> = BTreeSet::from(["id".to_string()]);
    let mut specs = Vec::with_capacity(database.properties.len());

    for (property, schema) in &database.properties {
        let base = field_name(property, &schema.id);
        let mut field = base.clone();
        let mut suffix = 2;
        while taken.contains(&field) {
            field = format!("{base}_{suffix}");
            suffix += 1;
        }
        taken.insert(field.clone());

        specs.push(FieldSpec {
            field,
            property: property.clone(),
            kind: schema.kind,
        });
    }

    specs
}

/// Application field name → Notion property name for every property.
#[must_use]
pub fn properties_map(database: &Database) -> BTreeMap<String, String> {
    fields(database)
        .into_iter()
        .map(|spec| (spec.field, spec.property))
        .collect()
}

/// Rust type of a property on the record struct.
#[must_use]
pub const fn record_type(kind: PropertyKind) -> &'static str {
    match kind {
        PropertyKind::Title
        | PropertyKind::RichText
        | PropertyKind::CreatedBy
        | PropertyKind::LastEditedBy => "String",
        PropertyKind::Select
        | PropertyKind::Status
        | PropertyKind::Url
        | PropertyKind::Email
        | PropertyKind::PhoneNumber => "Option<String>",
        PropertyKind::Checkbox => "bool",
        PropertyKind::Number => "Option<f64>",
        PropertyKind::CreatedTime | PropertyKind::LastEditedTime => "DateTime<Utc>",
        PropertyKind::Date => "Option<DateRange>",
        PropertyKind::MultiSelect | PropertyKind::Relation | PropertyKind::People => "Vec<String>",
        PropertyKind::Files => "Vec<FileRef>",
        PropertyKind::Formula => "Option<FormulaResult>",
        PropertyKind::Rollup | PropertyKind::Unsupported => "serde_json::Value",
    }
}

/// Rust type of a property on the input struct; `None` for read-only kinds.
#[must_use]
pub const fn input_type(kind: PropertyKind) -> Option<&'static str> {
    match kind {
        PropertyKind::Title
        | PropertyKind::RichText
        | PropertyKind::Select
        | PropertyKind::Status
        | PropertyKind::Url
        | PropertyKind::Email
        | PropertyKind::PhoneNumber => Some("Option<String>"),
        PropertyKind::Checkbox => Some("Option<bool>"),
        PropertyKind::Number => Some("Option<f64>"),
        PropertyKind::Date => Some("Option<DateRange>"),
        PropertyKind::MultiSelect | PropertyKind::Relation | PropertyKind::People => {
            Some("Option<Vec<String>>")
        }
        _ => None,
    }
}

/// Render the Rust source for a database.
pub fn render_type(database: &Database) -> NotionableResult<String> {
    let name = type_name(database)?;
    let title = database.title_text().unwrap_or_default().trim();
    let specs = fields(database);

    let uses = |needle: &str| {
        specs.iter().any(|s| {
            record_type(s.kind).contains(needle)
                || input_type(s.kind).is_some_and(|t| t.contains(needle))
        })
    };

    let mut out = String::new();
    let _ = writeln!(out, "//! Generated from the Notion database {title:?}. Do not edit by hand.");
    out.push('\n');

    if uses("DateTime") {
        out.push_str("use chrono::{DateTime, Utc};\n");
    }
    let crate_imports: Vec<&str> = ["DateRange", "FileRef", "FormulaResult"]
        .into_iter()
        .filter(|t| uses(t))
        .collect();
    match crate_imports.as_slice() {
        [] => {}
        [single] => {
            let _ = writeln!(out, "use notionable::{single};");
        }
        many => {
            let _ = writeln!(out, "use notionable::{{{}}};", many.join(", "));
        }
    }
    out.push_str("use serde::{Deserialize, Serialize};\n\n");

    let _ = writeln!(out, "/// Record of the {title:?} database.");
    out.push_str("#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]\n");
    let _ = writeln!(out, "pub struct {name} {{");
    out.push_str("    pub id: String,\n");
    for spec in &specs {
        let _ = writeln!(out, "    pub {}: {},", spec.ident(), record_type(spec.kind));
    }
    out.push_str("}\n\n");

    let _ = writeln!(out, "/// Writable fields of [`{name}`], for creates and partial updates.");
    out.push_str("#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]\n");
    let _ = writeln!(out, "pub struct {name}Input {{");
    for spec in &specs {
        if let Some(ty) = input_type(spec.kind) {
            out.push_str("    #[serde(skip_serializing_if = \"Option::is_none\")]\n");
            let _ = writeln!(out, "    pub {}: {ty},", spec.ident());
        }
    }
    out.push_str("}\n");

    Ok(out)
}

/// Write the type file for a database into `dir`, replacing any previous one.
#[instrument(skip(database, dir), fields(database_id = %database.id))]
pub async fn generate_type_file(
    database: &Database,
    dir: impl AsRef<Path>,
) -> NotionableResult<GeneratedType> {
    let dir = dir.as_ref();
    let type_name = type_name(database)?;
    let module = module_name(&type_name, &database.id);
    let path = dir.join(format!("{module}.rs"));
    let source = render_type(database)?;

    write_file(&path, &source).await?;
    info!(path = %path.display(), type_name = %type_name, "Generated type file");

    Ok(GeneratedType {
        type_name,
        module,
        path,
    })
}

/// Write type files for every database, then the module index.
pub async fn generate_type_files(
    databases: &[Database],
    dir: impl AsRef<Path>,
) -> NotionableResult<Vec<GeneratedType>> {
    let dir = dir.as_ref();
    let mut generated: Vec<GeneratedType> = Vec::with_capacity(databases.len());
    let mut written: BTreeMap<String, &str> = BTreeMap::new();

    for database in databases {
        let file = generate_type_file(database, dir).await?;
        if let Some(previous) = written.insert(file.module.clone(), &database.id) {
            warn!(
                module = %file.module,
                replaced = %previous,
                database_id = %database.id,
                "Two databases generate the same module; keeping the last one"
            );
            generated.retain(|g| g.module != file.module);
        }
        generated.push(file);
    }

    write_module_index(dir, &generated).await?;
    Ok(generated)
}

/// Write `mod.rs` declaring and re-exporting every generated module.
pub async fn write_module_index(
    dir: impl AsRef<Path>,
    generated: &[GeneratedType],
) -> NotionableResult<PathBuf> {
    let path = dir.as_ref().join("mod.rs");
    let modules: BTreeMap<&str, &str> = generated
        .iter()
        .map(|g| (g.module.as_str(), g.type_name.as_str()))
        .collect();

    let mut out = String::from("//! Generated Notion database types. Do not edit by hand.\n\n");
    for module in modules.keys() {
        let _ = writeln!(out, "pub mod {module};");
    }
    if !modules.is_empty() {
        out.push('\n');
    }
    for (module, type_name) in &modules {
        let _ = writeln!(out, "pub use {module}::{{{type_name}, {type_name}Input}};");
    }

    write_file(&path, &out).await?;
    debug!(path = %path.display(), modules = modules.len(), "Wrote module index");
    Ok(path)
}

async fn write_file(path: &Path, content: &str) -> NotionableResult<()> {
    let write_error = |e: std::io::Error| NotionableError::FileWrite {
        path: path.display().to_string(),
        reason: e.to_string(),
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_error)?;
    }

    tokio::fs::write(path, content).await.map_err(write_error)
}
