//! HTTP session implementation
//!
//! This module handles all HTTP requests for the mirror, including:
//! - Building HTTP clients with a cookie store
//! - Posting the login form
//! - GET requests for study pages
//! - Error classification into auth, fetch and invalid-session failures

use crate::config::SessionConfig;
use crate::range::Codepoint;
use crate::session::{is_valid_page, Credentials, Session};
use crate::{ConfigError, MirrorError};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Authenticated state for one run
///
/// The login cookie lives in the client's cookie store, so every run gets its
/// own client and a failed session never leaks into the next attempt.
#[derive(Debug, Clone)]
pub struct AuthContext {
    client: Client,
}

/// Session against the Kanji Koohii study pages
#[derive(Debug, Clone)]
pub struct KoohiiSession {
    login_url: Url,
    page_base: Url,
    marker: String,
}

/// Builds an HTTP client with a cookie store
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    let user_agent = format!(
        "{}/{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    Client::builder()
        .user_agent(user_agent)
        .cookie_store(true)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

impl KoohiiSession {
    /// Creates a session from configuration
    ///
    /// # Returns
    ///
    /// * `Ok(KoohiiSession)` - URLs resolved successfully
    /// * `Err(ConfigError)` - The base URL or paths do not form valid URLs
    pub fn new(config: &SessionConfig) -> Result<Self, ConfigError> {
        let base = Url::parse(&config.base_url).map_err(|e| {
            ConfigError::InvalidUrl(format!("base-url '{}': {}", config.base_url, e))
        })?;

        if base.cannot_be_a_base() {
            return Err(ConfigError::InvalidUrl(format!(
                "base-url '{}' cannot have paths",
                config.base_url
            )));
        }

        let join = |path: &str| {
            base.join(path)
                .map_err(|e| ConfigError::InvalidUrl(format!("path '{}': {}", path, e)))
        };

        Ok(Self {
            login_url: join(&config.login_path)?,
            page_base: join(&config.page_path)?,
            marker: config.valid_page_marker.clone(),
        })
    }

    /// Returns the login form URL
    pub fn login_url(&self) -> &Url {
        &self.login_url
    }

    /// Returns the study page URL for `codepoint`
    ///
    /// The character becomes the last, percent-encoded path segment. Returns
    /// `None` for codepoints that are not Unicode scalar values.
    pub fn page_url(&self, codepoint: Codepoint) -> Option<Url> {
        let c = codepoint.as_char()?;
        let mut url = self.page_base.clone();
        url.path_segments_mut()
            .ok()?
            .pop_if_empty()
            .push(c.encode_utf8(&mut [0; 4]));
        Some(url)
    }
}

impl Session for KoohiiSession {
    type Context = AuthContext;

    async fn authenticate(&self, credentials: &Credentials) -> Result<AuthContext, MirrorError> {
        let client = build_http_client()
            .map_err(|e| MirrorError::Auth(format!("could not build HTTP client: {}", e)))?;

        let form = [
            ("username", credentials.username.as_str()),
            ("password", credentials.password.as_str()),
            ("commit", "Sign In"),
            ("referer", "@homepage"),
        ];

        let response = client
            .post(self.login_url.clone())
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Error logging in: {}", e);
                MirrorError::Auth(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!("Login returned HTTP {}", status);
            return Err(MirrorError::Auth(format!("login returned HTTP {}", status)));
        }

        tracing::info!("Logged in as {}", credentials.username);
        Ok(AuthContext { client })
    }

    async fn fetch(
        &self,
        codepoint: Codepoint,
        context: &AuthContext,
    ) -> Result<String, MirrorError> {
        let url = self.page_url(codepoint).ok_or_else(|| MirrorError::Fetch {
            codepoint,
            message: "not a Unicode scalar value".to_string(),
        })?;

        let fetch_error = |message: String| MirrorError::Fetch { codepoint, message };

        let response = context
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_error(format!("HTTP {} from {}", status, url)));
        }

        let body = response.text().await.map_err(|e| fetch_error(e.to_string()))?;
        tracing::info!("Downloaded {}", url);

        if !is_valid_page(&body, &self.marker) {
            tracing::error!("Downloaded {}, but not logged in", url);
            tracing::debug!("Page body: {}", body);
            return Err(MirrorError::InvalidSession { codepoint });
        }

        Ok(body)
    }
}
