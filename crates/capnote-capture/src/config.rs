//! Capture configuration.
//!
//! Configuration can be loaded from:
//! - TOML files (`--config`, then `CAPNOTE_CONFIG`, then
//!   ~/.config/capnote/capnote.toml)
//! - Environment variables (CAPNOTE_* prefixed)
//!
//! # Example
//!
//! ```toml
//! scope = "admin"
//! extractor = "structural"
//! backend = "joplin"
//!
//! [joplin]
//! base_url = "http://localhost:41184"
//! token = "${JOPLIN_TOKEN}"
//!
//! [storage]
//! database_url = "sqlite://capnote.db?mode=rwc"
//! ```

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use capnote_core::defaults::{
    DATABASE_URL, ENV_BACKEND, ENV_CONFIG, ENV_DATABASE_URL, ENV_EXTRACTOR, ENV_FETCH_TIMEOUT,
    ENV_SCOPE,
};
use capnote_extract::FetchConfig;
use capnote_notes::{JoplinConfig, RestConfig};

use crate::composer::NoteStyle;
use crate::scope::CaptureScope;

static ENV_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("placeholder pattern is valid"));

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Content extraction strategy, fixed per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractorKind {
    #[default]
    Structural,
    TagStrip,
}

impl FromStr for ExtractorKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "structural" => Ok(Self::Structural),
            "tag_strip" | "tag-strip" => Ok(Self::TagStrip),
            _ => Err(ConfigError::InvalidValue {
                key: "extractor",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ExtractorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structural => write!(f, "structural"),
            Self::TagStrip => write!(f, "tag_strip"),
        }
    }
}

/// Note service notes are written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteBackend {
    #[default]
    Joplin,
    Rest,
}

impl NoteBackend {
    /// Joplin gets link-style notes, the REST service gets article-style.
    pub fn style(&self) -> NoteStyle {
        match self {
            Self::Joplin => NoteStyle::Link,
            Self::Rest => NoteStyle::Article,
        }
    }
}

impl FromStr for NoteBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "joplin" => Ok(Self::Joplin),
            "rest" => Ok(Self::Rest),
            _ => Err(ConfigError::InvalidValue {
                key: "backend",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for NoteBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Joplin => write!(f, "joplin"),
            Self::Rest => write!(f, "rest"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// sqlx SQLite URL, e.g. `sqlite://capnote.db?mode=rwc`.
    pub database_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_url: DATABASE_URL.to_string(),
        }
    }
}

/// Complete configuration for one capture deployment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub scope: CaptureScope,
    pub extractor: ExtractorKind,
    pub backend: NoteBackend,
    pub joplin: JoplinConfig,
    pub rest: RestConfig,
    pub fetch: FetchConfig,
    pub storage: StorageConfig,
}

impl CaptureConfig {
    /// Returns: ~/.config/capnote/capnote.toml
    pub fn default_config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from(".config"));
        path.push("capnote");
        path.push("capnote.toml");
        path
    }

    /// Load from `path`, else `CAPNOTE_CONFIG`, else the default path,
    /// falling back to environment variables when the default file does not
    /// exist. An explicitly named file must exist. The result is not
    /// validated.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        if let Some(path) = explicit_config_path(path, env::var(ENV_CONFIG).ok()) {
            info!("Loading capture config from: {}", path.display());
            return Self::from_file(&path);
        }

        let path = Self::default_config_path();
        if path.exists() {
            info!("Loading capture config from: {}", path.display());
            Self::from_file(&path)
        } else {
            debug!(
                "Config file not found at {}, using environment variables",
                path.display()
            );
            Ok(Self::from_env())
        }
    }

    /// Parse a TOML file after `${VAR}` substitution.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> ConfigResult<Self> {
        let content = substitute_env_vars(content);
        Ok(toml::from_str(&content)?)
    }

    /// Build from `CAPNOTE_*` variables, keeping defaults for anything unset
    /// or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let mut fetch = defaults.fetch;
        if let Some(secs) = env::var(ENV_FETCH_TIMEOUT).ok().and_then(|v| v.parse().ok()) {
            fetch.timeout_seconds = secs;
        }

        Self {
            scope: parse_env(ENV_SCOPE).unwrap_or(defaults.scope),
            extractor: parse_env(ENV_EXTRACTOR).unwrap_or(defaults.extractor),
            backend: parse_env(ENV_BACKEND).unwrap_or(defaults.backend),
            joplin: JoplinConfig::from_env(),
            rest: RestConfig::from_env(),
            fetch,
            storage: StorageConfig {
                database_url: env::var(ENV_DATABASE_URL).unwrap_or(defaults.storage.database_url),
            },
        }
    }

    /// Check the selected backend, fetch settings and storage URL.
    ///
    /// The unselected backend's section is ignored.
    pub fn validate(&self) -> ConfigResult<()> {
        let backend = match self.backend {
            NoteBackend::Joplin => self.joplin.validate(),
            NoteBackend::Rest => self.rest.validate(),
        };
        backend.map_err(|e| ConfigError::Validation(e.to_string()))?;

        if self.fetch.timeout_seconds == 0 {
            return Err(ConfigError::Validation(
                "fetch timeout_seconds must be > 0".to_string(),
            ));
        }

        if !self.storage.database_url.starts_with("sqlite:") {
            return Err(ConfigError::Validation(format!(
                "storage database_url must be a sqlite: URL, got: {}",
                self.storage.database_url
            )));
        }

        Ok(())
    }
}

/// The `--config` argument wins over a non-empty `CAPNOTE_CONFIG`.
fn explicit_config_path(arg: Option<&Path>, env_value: Option<String>) -> Option<PathBuf> {
    arg.map(Path::to_path_buf)
        .or_else(|| env_value.filter(|v| !v.is_empty()).map(PathBuf::from))
}

fn parse_env<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

/// Substitute environment variables in the format ${VAR_NAME}.
///
/// Unset variables are left as written.
pub fn substitute_env_vars(content: &str) -> String {
    ENV_PLACEHOLDER
        .replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
}
