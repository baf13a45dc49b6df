//! Storage traits and error types
//!
//! This module defines the trait interface for artifact stores and
//! associated error types.

use crate::range::Codepoint;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Artifact directory {0} is not a directory")]
    NotADirectory(PathBuf),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Trait for artifact store implementations
///
/// An artifact is the raw page content for exactly one codepoint. Its
/// existence in the store is what resume and auditing look at.
pub trait ArtifactStore {
    /// Persists the artifact for `codepoint`, replacing any previous one
    ///
    /// Returns once the content is durably written.
    fn write(&self, codepoint: Codepoint, content: &[u8]) -> StoreResult<()>;

    /// Reads the artifact for `codepoint`, if present
    fn read(&self, codepoint: Codepoint) -> StoreResult<Option<Vec<u8>>>;

    /// Lists the codepoints of every stored artifact in ascending order
    fn list_identifiers(&self) -> StoreResult<Vec<Codepoint>>;
}
