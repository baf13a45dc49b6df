//! Filesystem artifact store
//!
//! This module provides a directory-backed implementation of the
//! ArtifactStore trait: one file per codepoint, named by `ArtifactNaming`.

use crate::range::Codepoint;
use crate::store::naming::ArtifactNaming;
use crate::store::traits::{ArtifactStore, StoreError, StoreResult};
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Directory-backed artifact store
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
    naming: ArtifactNaming,
}

impl DirectoryStore {
    /// Opens a store rooted at `root` without touching the filesystem
    pub fn new(root: impl Into<PathBuf>, naming: ArtifactNaming) -> Self {
        Self {
            root: root.into(),
            naming,
        }
    }

    /// Opens a store rooted at `root`, creating the directory if needed
    ///
    /// # Returns
    ///
    /// * `Ok(DirectoryStore)` - The directory exists and is usable
    /// * `Err(StoreError)` - The directory could not be created, or `root` is a file
    pub fn create(root: impl Into<PathBuf>, naming: ArtifactNaming) -> StoreResult<Self> {
        let store = Self::new(root, naming);

        fs::create_dir_all(&store.root).map_err(|e| StoreError::io(&store.root, e))?;
        if !store.root.is_dir() {
            return Err(StoreError::NotADirectory(store.root.clone()));
        }

        Ok(store)
    }

    /// Returns the root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the filename scheme
    pub fn naming(&self) -> &ArtifactNaming {
        &self.naming
    }

    /// Returns the path of the artifact for `codepoint`
    pub fn path_for(&self, codepoint: Codepoint) -> PathBuf {
        self.root.join(self.naming.file_name(codepoint))
    }
}

impl ArtifactStore for DirectoryStore {
    fn write(&self, codepoint: Codepoint, content: &[u8]) -> StoreResult<()> {
        let path = self.path_for(codepoint);

        let mut file = File::create(&path).map_err(|e| StoreError::io(&path, e))?;
        file.write_all(content)
            .and_then(|_| file.sync_all())
            .map_err(|e| StoreError::io(&path, e))?;

        tracing::info!("Saved {} to {}", codepoint, path.display());
        Ok(())
    }

    fn read(&self, codepoint: Codepoint) -> StoreResult<Option<Vec<u8>>> {
        let path = self.path_for(codepoint);
        match fs::read(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(path, e)),
        }
    }

    fn list_identifiers(&self) -> StoreResult<Vec<Codepoint>> {
        let entries = fs::read_dir(&self.root).map_err(|e| StoreError::io(&self.root, e))?;

        let mut codepoints = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io(&self.root, e))?;
            let name = entry.file_name();
            match name.to_str().and_then(|n| self.naming.parse(n)) {
                Some(codepoint) => codepoints.push(codepoint),
                None => tracing::debug!("Ignoring non-artifact entry {:?}", name),
            }
        }

        codepoints.sort();
        Ok(codepoints)
    }
}
