//! Session module for authenticated page access
//!
//! This module defines the interface the crawler needs from the remote site:
//! - Logging in once per run to obtain an authenticated context
//! - Fetching one page per codepoint with that context
//! - Recognising pages served to a session that is no longer logged in
//!
//! `KoohiiSession` is the HTTP implementation.

mod koohii;

pub use koohii::{build_http_client, AuthContext, KoohiiSession};

use crate::range::Codepoint;
use crate::MirrorError;
use std::fmt;

/// Login credentials
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// An authenticated source of pages
///
/// # Errors
///
/// * `authenticate` fails with `MirrorError::Auth`
/// * `fetch` fails with `MirrorError::Fetch` on transport problems and
///   `MirrorError::InvalidSession` when the page shows the session is not
///   logged in
#[allow(async_fn_in_trait)]
pub trait Session {
    /// State produced by logging in and required by every fetch
    type Context;

    /// Logs in and returns a fresh authenticated context
    async fn authenticate(&self, credentials: &Credentials) -> Result<Self::Context, MirrorError>;

    /// Fetches the page for `codepoint`
    async fn fetch(
        &self,
        codepoint: Codepoint,
        context: &Self::Context,
    ) -> Result<String, MirrorError>;
}

/// Returns true if `page` was served to a logged-in session
///
/// Logged-in study pages embed the story editor; anonymous ones do not.
pub fn is_valid_page(page: &str, marker: &str) -> bool {
    page.contains(marker)
}
