//! JSON File Store - Atomic Scenario Document Persistence
//!
//! Implements the `ScenarioStore` port over plain JSON files. Writes go to a
//! temporary sibling file first, then rename into place, so a failed run can
//! never leave a partially written document. Reads tolerate a single bare
//! scenario object in place of an array.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use tracing::info;

use crate::domain::Scenario;
use crate::ports::store::{ScenarioStore, StoreError};

/// One-or-many tolerant document shape.
#[derive(Deserialize)]
#[serde(untagged)]
enum Document {
    Many(Vec<Scenario>),
    One(Box<Scenario>),
}

/// Scenario store over pretty-printed JSON files.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFileStore;

impl JsonFileStore {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ScenarioStore for JsonFileStore {
    fn load(&self, path: &Path) -> Result<Vec<Scenario>, StoreError> {
        let content = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let document: Document =
            serde_json::from_str(&content).map_err(|source| StoreError::Format {
                path: path.to_path_buf(),
                source,
            })?;

        let scenarios = match document {
            Document::Many(scenarios) => scenarios,
            Document::One(scenario) => vec![*scenario],
        };

        info!(
            path = %path.display(),
            scenarios = scenarios.len(),
            "Scenario document loaded"
        );
        Ok(scenarios)
    }

    fn save(&self, path: &Path, scenarios: &[Scenario], indent: usize) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        };

        let indent_bytes = vec![b' '; indent];
        let mut buffer = Vec::new();
        let formatter = PrettyFormatter::with_indent(&indent_bytes);
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        scenarios
            .serialize(&mut serializer)
            .map_err(|source| StoreError::Format {
                path: path.to_path_buf(),
                source,
            })?;
        buffer.push(b'\n');

        // Write to a sibling tmp file, then atomic rename
        let tmp_path = path.with_extension("json.tmp");
        std::fs::write(&tmp_path, &buffer).map_err(io_err)?;
        std::fs::rename(&tmp_path, path).map_err(io_err)?;

        info!(
            path = %path.display(),
            scenarios = scenarios.len(),
            bytes = buffer.len(),
            "Scenario document saved"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_object_treated_as_one_element_array() {
        let json = r#"{
            "description": "bare object",
            "categories": ["A", "B"],
            "players": {
                "p1": {"max_bet": 100, "predictions": [0.7, 0.3]},
                "p2": {"max_bet": 100, "predictions": [0.4, 0.6]}
            }
        }"#;
        let document: Document = serde_json::from_str(json).unwrap();
        let scenarios = match document {
            Document::Many(s) => s,
            Document::One(s) => vec![*s],
        };
        assert_eq!(scenarios.len(), 1);
        assert_eq!(scenarios[0].description, "bare object");
    }

    #[test]
    fn test_malformed_document_is_a_format_error() {
        let store = JsonFileStore::new();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            store.load(&path),
            Err(StoreError::Format { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let store = JsonFileStore::new();
        assert!(matches!(
            store.load(Path::new("no_such_file.json")),
            Err(StoreError::Io { .. })
        ));
    }
}
