//! Wardrobe inventory catalog.
//!
//! The catalog is a read-only mapping from item identifier to descriptive
//! attributes. Identifiers double as relative storage paths under the closet
//! root, so the catalog key is the single source of truth for both the
//! selection contract and garment resolution.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Descriptive attributes of a single wardrobe item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GarmentAttributes {
    pub clothing_type: String,
    pub color: String,
    pub material: String,
    pub season_suitability: Vec<String>,
    pub description: String,
}

/// Errors raised while loading a catalog document.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog read error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Catalog parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Read-only wardrobe catalog: identifier → attributes.
///
/// Keys are kept sorted so the serialized snapshot embedded in selection
/// prompts is deterministic across runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    items: BTreeMap<String, GarmentAttributes>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a catalog from a JSON document (identifier → attributes).
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a catalog from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn insert(&mut self, id: impl Into<String>, attributes: GarmentAttributes) {
        self.items.insert(id.into(), attributes);
    }

    pub fn get(&self, id: &str) -> Option<&GarmentAttributes> {
        self.items.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Serialize the full catalog for verbatim embedding in a prompt.
    ///
    /// The remote model sees the complete catalog, not a subset, so it can
    /// cross-reference attributes for color/season coordination.
    pub fn to_prompt_json(&self) -> String {
        serde_json::to_string_pretty(&self.items).unwrap_or_else(|_| "{}".into())
    }
}
