//! Descriptive model metadata and the read-only model catalog.
//!
//! A catalog is a JSON array of model entries:
//!
//! ```json
//! [{ "key": "wbbc", "name": "...", "localized_name": "...",
//!    "description": "...", "localized_description": "...",
//!    "populations": [{ "name": "...", "localized_name": "...",
//!                      "description": "...", "localized_description": "..." }] }]
//! ```
//!
//! The legacy field names `name_cn`, `desc`, `desc_cn` and `admix` are
//! accepted as aliases. Localized fields default to the empty string.
use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::model::errors::{ModelError, ModelResult};

/// Catalog shipped with the crate (Westlake BioBank for Chinese K4).
const BUILTIN_CATALOG: &str = include_str!("../../data/catalog.json");

/// One reference population of a model, in column order of its frequency
/// record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationInfo {
    pub name: String,
    #[serde(default, alias = "name_cn")]
    pub localized_name: String,
    #[serde(default, alias = "desc")]
    pub description: String,
    #[serde(default, alias = "desc_cn")]
    pub localized_description: String,
}

/// Descriptive metadata of a reference model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub key: String,
    pub name: String,
    #[serde(default, alias = "name_cn")]
    pub localized_name: String,
    #[serde(default, alias = "desc")]
    pub description: String,
    #[serde(default, alias = "desc_cn")]
    pub localized_description: String,
    #[serde(default, alias = "admix")]
    pub populations: Vec<PopulationInfo>,
}

impl ModelMetadata {
    pub fn population_count(&self) -> usize {
        self.populations.len()
    }

    /// Case-insensitive key comparison.
    pub fn matches_key(&self, key: &str) -> bool {
        self.key.to_lowercase() == key.to_lowercase()
    }
}

/// Immutable, ordered set of model metadata entries with unique keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelCatalog {
    models: Vec<ModelMetadata>,
}

impl ModelCatalog {
    /// Build a catalog, rejecting case-insensitive duplicate keys.
    ///
    /// # Errors
    /// - [`ModelError::DuplicateModelKey`] naming the second occurrence.
    pub fn new(models: Vec<ModelMetadata>) -> ModelResult<Self> {
        for (i, model) in models.iter().enumerate() {
            if models[..i].iter().any(|prev| prev.matches_key(&model.key)) {
                return Err(ModelError::DuplicateModelKey { key: model.key.clone() });
            }
        }
        Ok(Self { models })
    }

    /// The catalog compiled into the crate.
    pub fn builtin() -> ModelResult<Self> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn from_json(json: &str) -> ModelResult<Self> {
        let models: Vec<ModelMetadata> = serde_json::from_str(json)?;
        Self::new(models)
    }

    /// Load a catalog from a JSON file.
    ///
    /// # Errors
    /// - [`ModelError::MissingDataFile`] if the file does not exist.
    /// - [`ModelError::ReadFailed`] on other I/O failures.
    /// - Anything [`ModelCatalog::from_json`] reports.
    pub fn from_path(path: &Path) -> ModelResult<Self> {
        if !path.is_file() {
            return Err(ModelError::MissingDataFile { path: path.display().to_string() });
        }
        let json = fs::read_to_string(path).map_err(|e| ModelError::ReadFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&json)
    }

    /// Entry whose key matches `key` case-insensitively.
    pub fn get(&self, key: &str) -> Option<&ModelMetadata> {
        self.models.iter().find(|m| m.matches_key(key))
    }

    /// Keys in declaration order.
    pub fn keys(&self) -> Vec<String> {
        self.models.iter().map(|m| m.key.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // The shipped catalog must parse and expose the four WBBC populations in
    // declared order.
    fn builtin_catalog_lists_wbbc_with_four_populations() {
        // Arrange / Act
        let catalog = ModelCatalog::builtin().expect("built-in catalog parses");
        let wbbc = catalog.get("wbbc").expect("wbbc present");

        // Assert
        assert_eq!(catalog.keys(), vec!["wbbc".to_string()]);
        assert_eq!(wbbc.name, "Westlake BioBank for Chinese K4");
        assert!(!wbbc.localized_name.is_empty());
        let names: Vec<&str> = wbbc.populations.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            ["North Han Chinese", "Central Han Chinese", "South Han Chinese", "Lingnan Han Chinese"]
        );
    }

    #[test]
    fn lookup_ignores_key_case() {
        let catalog = ModelCatalog::builtin().expect("built-in catalog parses");
        assert!(catalog.get("WBBC").is_some());
        assert!(catalog.get("WbBc").is_some());
        assert!(catalog.get("k13").is_none());
    }

    #[test]
    fn canonical_and_legacy_field_names_both_parse() {
        let json = r#"[
            {"key": "a", "name": "A", "localized_name": "甲", "description": "d",
             "populations": [{"name": "P1", "localized_description": "x"}]},
            {"key": "b", "name": "B", "name_cn": "乙", "desc": "e", "desc_cn": "f",
             "admix": [{"name": "Q1", "name_cn": "丙"}, {"name": "Q2"}]}
        ]"#;
        let catalog = ModelCatalog::from_json(json).expect("catalog parses");

        let a = catalog.get("a").expect("a present");
        assert_eq!(a.localized_name, "甲");
        assert_eq!(a.populations[0].localized_description, "x");
        assert_eq!(a.populations[0].localized_name, "");

        let b = catalog.get("b").expect("b present");
        assert_eq!(b.localized_name, "乙");
        assert_eq!(b.description, "e");
        assert_eq!(b.localized_description, "f");
        assert_eq!(b.population_count(), 2);
        assert_eq!(b.populations[0].localized_name, "丙");
    }

    #[test]
    fn duplicate_keys_are_rejected_case_insensitively() {
        let json = r#"[{"key": "wbbc", "name": "x"}, {"key": "WBBC", "name": "y"}]"#;
        assert_eq!(
            ModelCatalog::from_json(json),
            Err(ModelError::DuplicateModelKey { key: "WBBC".into() })
        );
    }

    #[test]
    fn malformed_json_is_reported() {
        assert!(matches!(
            ModelCatalog::from_json("{\"key\": 1}"),
            Err(ModelError::InvalidCatalog { .. })
        ));
    }

    #[test]
    fn missing_catalog_file_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("catalog.json");
        assert!(matches!(
            ModelCatalog::from_path(&path),
            Err(ModelError::MissingDataFile { .. })
        ));
    }
}
