//! In-memory artifact store (for testing)

use crate::range::Codepoint;
use crate::store::traits::{ArtifactStore, StoreError, StoreResult};
use std::collections::BTreeMap;
use std::io;
use std::sync::Mutex;

/// Artifact store backed by a map, recording the order of writes
#[derive(Debug, Default)]
pub struct MemoryStore {
    artifacts: Mutex<BTreeMap<Codepoint, Vec<u8>>>,
    writes: Mutex<Vec<Codepoint>>,
    unreadable: bool,
    fail_write_at: Option<Codepoint>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store already holding placeholder artifacts for `codepoints`
    pub fn with_identifiers(codepoints: impl IntoIterator<Item = u32>) -> Self {
        let store = Self::new();
        {
            let mut artifacts = store.artifacts.lock().unwrap();
            for c in codepoints {
                artifacts.insert(Codepoint(c), b"stored".to_vec());
            }
        }
        store
    }

    /// A store whose enumeration always fails
    pub fn unreadable() -> Self {
        Self {
            unreadable: true,
            ..Self::default()
        }
    }

    /// A store that fails to persist `codepoint`
    pub fn failing_write_at(codepoint: u32) -> Self {
        Self {
            fail_write_at: Some(Codepoint(codepoint)),
            ..Self::default()
        }
    }

    /// Codepoints in the order they were written
    pub fn writes(&self) -> Vec<Codepoint> {
        self.writes.lock().unwrap().clone()
    }

    /// Stored codepoints as plain integers, ascending
    pub fn stored(&self) -> Vec<u32> {
        self.artifacts
            .lock()
            .unwrap()
            .keys()
            .map(|c| c.value())
            .collect()
    }
}

impl ArtifactStore for MemoryStore {
    fn write(&self, codepoint: Codepoint, content: &[u8]) -> StoreResult<()> {
        if self.fail_write_at == Some(codepoint) {
            return Err(StoreError::io(
                "<memory>",
                io::Error::new(io::ErrorKind::Other, "disk full"),
            ));
        }
        self.artifacts
            .lock()
            .unwrap()
            .insert(codepoint, content.to_vec());
        self.writes.lock().unwrap().push(codepoint);
        Ok(())
    }

    fn read(&self, codepoint: Codepoint) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.artifacts.lock().unwrap().get(&codepoint).cloned())
    }

    fn list_identifiers(&self) -> StoreResult<Vec<Codepoint>> {
        if self.unreadable {
            return Err(StoreError::io(
                "<memory>",
                io::Error::new(io::ErrorKind::PermissionDenied, "unreadable"),
            ));
        }
        Ok(self.artifacts.lock().unwrap().keys().copied().collect())
    }
}
