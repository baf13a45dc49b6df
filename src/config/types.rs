use crate::range::Domain;
use crate::store::ArtifactNaming;
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

/// Main configuration structure for Koohii-Mirror
///
/// Every section and field is optional in the TOML file; missing values take
/// the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub session: SessionConfig,
    pub crawler: CrawlerConfig,
    pub domain: DomainConfig,
    pub output: OutputConfig,
}

/// Remote site and login configuration
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Site root, e.g. "https://kanji.koohii.com"
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Path of the login form, relative to the base URL
    #[serde(rename = "login-path")]
    pub login_path: String,

    /// Path the page character is appended to
    #[serde(rename = "page-path")]
    pub page_path: String,

    /// Substring present only on pages served to a logged-in session
    #[serde(rename = "valid-page-marker")]
    pub valid_page_marker: String,

    pub username: String,

    pub password: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            base_url: "https://kanji.koohii.com".to_string(),
            login_path: "/login".to_string(),
            page_path: "/study/kanji/".to_string(),
            valid_page_marker: "EditStoryComponent".to_string(),
            username: String::new(),
            password: String::new(),
        }
    }
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("base_url", &self.base_url)
            .field("login_path", &self.login_path)
            .field("page_path", &self.page_path)
            .field("valid_page_marker", &self.valid_page_marker)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Delay after each saved page (milliseconds)
    #[serde(rename = "delay-ms")]
    pub delay_ms: u64,

    /// Maximum number of full runs before giving up
    pub attempts: u32,

    /// Range specification; absent means resume from the store
    pub range: Option<String>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            delay_ms: 1000,
            attempts: 3,
            range: None,
        }
    }
}

/// Default codepoint domain
///
/// Defaults to the CJK Unified Ideographs block covered by the study pages.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DomainConfig {
    pub lower: u32,
    pub upper: u32,
}

impl DomainConfig {
    pub fn to_domain(&self) -> Domain {
        Domain::new(self.lower, self.upper)
    }
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            lower: 0x4e00,
            upper: 0x9faf,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory holding one file per page
    pub directory: PathBuf,

    /// Filename prefix before the hex codepoint
    pub prefix: String,

    /// Filename extension, without the dot
    pub extension: String,
}

impl OutputConfig {
    pub fn naming(&self) -> ArtifactNaming {
        ArtifactNaming::new(self.prefix.clone(), self.extension.clone())
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("pages"),
            prefix: "u".to_string(),
            extension: "html".to_string(),
        }
    }
}
