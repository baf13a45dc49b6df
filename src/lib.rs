//! Koohii-Mirror: a resumable, rate-limited page mirror
//!
//! This crate logs into a session-gated site, downloads one page per Unicode
//! codepoint in a configured domain, stores each page as a file, and audits
//! the resulting directory for gaps.

pub mod config;
pub mod crawler;
pub mod integrity;
pub mod output;
pub mod range;
pub mod session;
pub mod store;

use thiserror::Error;

/// Main error type for Koohii-Mirror operations
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid range: {0}")]
    Range(#[from] RangeError),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Failed to fetch {codepoint}: {message}")]
    Fetch {
        codepoint: range::Codepoint,
        message: String,
    },

    #[error("Downloaded {codepoint}, but the session is not logged in")]
    InvalidSession { codepoint: range::Codepoint },

    #[error("Storage error: {0}")]
    Store(#[from] store::StoreError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of a [`MirrorError`]
///
/// The run retrier and the CLI branch on this instead of on error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Login failed; nothing was fetched
    Auth,
    /// Transport-level failure fetching one codepoint
    Fetch,
    /// Page fetched but the session was no longer authenticated
    InvalidSession,
    /// Persisting or reading artifacts failed
    Io,
    /// Bad configuration or range specification
    Config,
}

impl MirrorError {
    /// Returns the kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) | Self::Range(_) => ErrorKind::Config,
            Self::Auth(_) => ErrorKind::Auth,
            Self::Fetch { .. } | Self::Reqwest(_) => ErrorKind::Fetch,
            Self::InvalidSession { .. } => ErrorKind::InvalidSession,
            Self::Store(_) | Self::Io(_) => ErrorKind::Io,
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Range specification errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RangeError {
    #[error("'{0}' is neither a number nor a single character")]
    InvalidToken(String),
}

/// Result type alias for Koohii-Mirror operations
pub type Result<T> = std::result::Result<T, MirrorError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Crawler, RunOutcome};
pub use integrity::{audit_directory, IntegrityReport};
pub use range::{Codepoint, Domain, Identifiers, RangeSpec};
pub use session::{Credentials, KoohiiSession, Session};
pub use store::{ArtifactNaming, ArtifactStore, DirectoryStore};
