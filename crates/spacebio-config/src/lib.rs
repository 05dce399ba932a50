//! Configuration loading for spacebio.
//! Reads spacebio.toml from the current directory or the path in SPACEBIO_CONFIG,
//! then applies SPACEBIO_API_BASE / SPACEBIO_TOKEN overrides (a `.env` file is honoured).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

pub const CONFIG_ENV: &str = "SPACEBIO_CONFIG";
pub const API_BASE_ENV: &str = "SPACEBIO_API_BASE";
pub const TOKEN_ENV: &str = "SPACEBIO_TOKEN";
pub const DEFAULT_CONFIG_FILE: &str = "spacebio.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config file {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },

    #[error("Invalid config file {path}: {source}")]
    Parse { path: PathBuf, source: toml::de::Error },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub query: QueryConfig,
    #[serde(default)]
    pub library: LibraryConfig,
    #[serde(default)]
    pub story: StoryConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Clone, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Bearer token for deployments that require auth.
    #[serde(default)]
    pub token: Option<String>,
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("base_url", &self.base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

fn default_base_url()     -> String { "http://127.0.0.1:8000".to_string() }
fn default_timeout_secs() -> u64    { 30 }

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_timeout_secs(),
            token: None,
        }
    }
}

impl BackendConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueryConfig {
    #[serde(default = "default_search_top_k")]
    pub search_top_k: u32,
    #[serde(default = "default_ask_top_k")]
    pub ask_top_k: u32,
    #[serde(default = "default_mindmap_top_k")]
    pub mindmap_top_k: u32,
    /// Ask the backend to synthesise speech for every answer.
    #[serde(default)]
    pub tts: bool,
    #[serde(default)]
    pub voice: Option<String>,
}

fn default_search_top_k()  -> u32 { 10 }
fn default_ask_top_k()     -> u32 { 8 }
fn default_mindmap_top_k() -> u32 { 20 }

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            search_top_k: default_search_top_k(),
            ask_top_k: default_ask_top_k(),
            mindmap_top_k: default_mindmap_top_k(),
            tts: false,
            voice: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LibraryConfig {
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page_size() -> u32 { 20 }

impl Default for LibraryConfig {
    fn default() -> Self {
        Self { page_size: default_page_size() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoryConfig {
    /// Candidate endpoints, tried in order until one succeeds.
    #[serde(default = "default_story_endpoints")]
    pub endpoints: Vec<String>,
    #[serde(default = "default_story_mode")]
    pub mode: String,
    #[serde(default = "default_story_length")]
    pub length: String,
    #[serde(default = "default_story_top_k")]
    pub top_k: u32,
}

fn default_story_endpoints() -> Vec<String> {
    vec!["/story".to_string(), "/storytelling".to_string()]
}
fn default_story_mode()   -> String { "scientific".to_string() }
fn default_story_length() -> String { "short".to_string() }
fn default_story_top_k()  -> u32    { 15 }

impl Default for StoryConfig {
    fn default() -> Self {
        Self {
            endpoints: default_story_endpoints(),
            mode: default_story_mode(),
            length: default_story_length(),
            top_k: default_story_top_k(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct StorageConfig {
    /// Directory for bookmarks and the session cache. Defaults to the
    /// platform data dir.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl StorageConfig {
    pub fn resolved_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("spacebio")
        })
    }
}


impl Config {
    /// Load configuration.
    /// Checks SPACEBIO_CONFIG first, then ./spacebio.toml; a missing file yields defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let path = std::env::var(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));

        let mut config = if path.exists() {
            Self::from_file(&path)?
        } else {
            debug!(path = %path.display(), "No config file, using defaults");
            Self::default()
        };

        config.apply_overrides(
            std::env::var(API_BASE_ENV).ok(),
            std::env::var(TOKEN_ENV).ok(),
        );
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&content)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Environment values win over the file. Empty strings are ignored.
    pub fn apply_overrides(&mut self, api_base: Option<String>, token: Option<String>) {
        if let Some(base) = api_base.filter(|b| !b.trim().is_empty()) {
            self.backend.base_url = base.trim().to_string();
        }
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            self.backend.token = Some(token.trim().to_string());
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("backend.base_url must not be empty".into()));
        }
        if self.backend.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid("backend.request_timeout_secs must be > 0".into()));
        }
        if self.library.page_size == 0 {
            return Err(ConfigError::Invalid("library.page_size must be > 0".into()));
        }
        if self.story.endpoints.is_empty() {
            return Err(ConfigError::Invalid("story.endpoints must list at least one path".into()));
        }
        Ok(())
    }
}
