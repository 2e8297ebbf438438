//! Store Port - Scenario Document Interface
//!
//! Defines the trait the usecases layer loads and saves scenario documents
//! through, plus the error taxonomy for document I/O. Adapters implement
//! the trait; the calculation ring never touches a file.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::Scenario;

/// Errors surfaced by scenario document storage.
///
/// Any of these aborts the run with nothing partially written; document
/// problems are never recoverable mid-run.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The file could not be read or written.
    #[error("failed to access {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON, or its top-level shape is neither a
    /// scenario object nor an array of scenario objects.
    #[error("invalid scenario document {path}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Trait for scenario document providers.
///
/// A document is an array of scenarios; a single bare scenario object is
/// accepted on read and treated as a one-element array.
pub trait ScenarioStore {
    /// Load every scenario from the document at `path`.
    ///
    /// # Errors
    /// [`StoreError`] on I/O failure or malformed content.
    fn load(&self, path: &Path) -> Result<Vec<Scenario>, StoreError>;

    /// Write scenarios to `path` as a pretty-printed JSON array with the
    /// given indent width. Must be atomic: on failure the previous file
    /// content is left untouched.
    ///
    /// # Errors
    /// [`StoreError`] on serialization or I/O failure.
    fn save(&self, path: &Path, scenarios: &[Scenario], indent: usize) -> Result<(), StoreError>;
}
