//! Storage module for persisting downloaded pages
//!
//! This module handles everything that touches the artifact directory:
//! - The canonical, sort-stable filename scheme
//! - Writing and reading one artifact per codepoint
//! - Enumerating stored codepoints for resume

mod directory;
#[cfg(test)]
mod memory;
mod naming;
mod traits;

pub use directory::DirectoryStore;
#[cfg(test)]
pub(crate) use memory::MemoryStore;
pub use naming::ArtifactNaming;
pub use traits::{ArtifactStore, StoreError, StoreResult};
