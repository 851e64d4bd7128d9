use super::PlannedUpdate;
use crate::error::{Result, VersionsError};
use crate::model::Coordinate;
use std::collections::BTreeMap;
use toml_edit::{DocumentMut, Item, Value};

/// A `[libraries]` entry of a version catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LibraryEntry {
    group: String,
    name: String,
    version: Option<String>,
    version_ref: Option<String>,
}

impl LibraryEntry {
    /// Reads `"g:a:v"`, `{ module = "g:a", ... }` and
    /// `{ group = "g", name = "a", ... }` entries.
    fn parse(item: &Item) -> Option<Self> {
        if let Some(notation) = item.as_str() {
            let coordinate = Coordinate::parse(notation)?;
            let version = (!coordinate.is_undeclared()).then(|| coordinate.version.clone());
            return Some(Self {
                group: coordinate.group,
                name: coordinate.artifact,
                version,
                version_ref: None,
            });
        }

        let table = item.as_table_like()?;
        let (group, name) = match table.get("module").and_then(Item::as_str) {
            Some(module) => {
                let coordinate = Coordinate::parse(module)?;
                (coordinate.group, coordinate.artifact)
            }
            None => (
                table.get("group").and_then(Item::as_str)?.to_string(),
                table.get("name").and_then(Item::as_str)?.to_string(),
            ),
        };
        let version = table.get("version");
        Some(Self {
            group,
            name,
            version: version.and_then(Item::as_str).map(str::to_string),
            version_ref: version
                .and_then(Item::as_table_like)
                .and_then(|version| version.get("ref"))
                .and_then(Item::as_str)
                .map(str::to_string),
        })
    }
}

/// Replaces a string value, keeping its surrounding whitespace and comments.
fn replace_str(item: &mut Item, text: &str) -> bool {
    let Some(value) = item.as_value_mut() else {
        return false;
    };
    let decor = value.decor().clone();
    *value = Value::from(text);
    *value.decor_mut() = decor;
    true
}

fn set_version(item: &mut Item, update: &PlannedUpdate) -> bool {
    if item.is_str() {
        let notation = format!("{}:{}", update.module(), update.to);
        return replace_str(item, &notation);
    }
    item.as_table_like_mut()
        .and_then(|table| table.get_mut("version"))
        .is_some_and(|version| replace_str(version, &update.to))
}

/// Applies `updates` to a `libs.versions.toml` document. Inline versions are
/// replaced in place; `version.ref` entries update the shared `[versions]`
/// key once. A version is only replaced while it still reads the planned
/// `from` version.
pub fn update_catalog<'a>(
    content: &str,
    updates: &'a [PlannedUpdate],
) -> Result<(String, Vec<&'a PlannedUpdate>)> {
    let mut doc = content
        .parse::<DocumentMut>()
        .map_err(|e| VersionsError::Catalog(format!("Failed to parse TOML: {e}")))?;

    let mut applied = Vec::new();
    let mut by_ref: BTreeMap<String, Vec<&'a PlannedUpdate>> = BTreeMap::new();

    if let Some(libraries) = doc.get_mut("libraries").and_then(Item::as_table_like_mut) {
        for (_, item) in libraries.iter_mut() {
            let Some(entry) = LibraryEntry::parse(item) else {
                continue;
            };
            let Some(update) = updates
                .iter()
                .find(|update| update.is_module(&entry.group, &entry.name))
            else {
                continue;
            };

            if let Some(version_ref) = entry.version_ref {
                by_ref.entry(version_ref).or_default().push(update);
            } else if entry.version.as_deref() == Some(update.from.as_str())
                && set_version(item, update)
            {
                applied.push(update);
            }
        }
    }

    for (version_ref, users) in by_ref {
        let Some(first) = users.first() else {
            continue;
        };
        if users.iter().any(|update| update.to != first.to) {
            tracing::warn!(
                "Libraries sharing version '{}' have different upgrades; leaving it unchanged",
                version_ref
            );
            continue;
        }
        let Some(version) = doc
            .get_mut("versions")
            .and_then(Item::as_table_like_mut)
            .and_then(|versions| versions.get_mut(&version_ref))
        else {
            tracing::warn!("Version reference '{}' is not declared", version_ref);
            continue;
        };
        if version.as_str() == Some(first.from.as_str()) && replace_str(version, &first.to) {
            applied.extend(users);
        }
    }

    Ok((doc.to_string(), applied))
}
