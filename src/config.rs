//! Configuration with layered resolution using figment.
//!
//! Resolution order (highest priority last):
//! 1. Built-in defaults
//! 2. User config: `~/.config/vademecum/config.toml` (XDG) or platform config dir
//! 3. Project config: `.vademecum.toml`
//! 4. Environment variables: `VADEMECUM_*`, nested keys split on `__`
//!    (e.g. `VADEMECUM_SEARCH__DEFAULT_LIMIT=50`)
//!
//! # Example
//!
//! ```toml
//! [content]
//! paths = ["content/algorithms", "content/child-adolescent.json"]
//!
//! [search]
//! default_limit = 20
//!
//! [levels]
//! fallback = "nearest"
//!
//! [log]
//! level = "info"
//! ```

use std::ops::Deref;
use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;

use crate::services::LevelFallback;

/// Project config file name, looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = ".vademecum.toml";

/// Boxed wrapper for figment::Error to reduce Result size on the stack.
#[derive(Debug)]
pub struct ConfigError(Box<figment::Error>);

impl Deref for ConfigError {
    type Target = figment::Error;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self(Box::new(err))
    }
}

/// Root configuration structure. Every section has defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub content: ContentConfig,
    pub search: SearchConfig,
    pub levels: LevelConfig,
    pub log: LogConfig,
}

/// Where content files are read from.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// JSON content files or directories of them. Empty means `./content`.
    pub paths: Vec<PathBuf>,
}

impl ContentConfig {
    /// Configured paths, or `./content` when none are set.
    pub fn effective_paths(&self) -> Vec<PathBuf> {
        if self.paths.is_empty() {
            vec![PathBuf::from("content")]
        } else {
            self.paths.clone()
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Result cap applied when a caller does not pass one. `0` means no cap.
    pub default_limit: usize,
}

impl SearchConfig {
    /// Cap for one search: the caller's limit, else the default. A limit of
    /// `0` from either source means unlimited.
    pub fn resolve_limit(&self, requested: Option<usize>) -> Option<usize> {
        match requested.unwrap_or(self.default_limit) {
            0 => None,
            limit => Some(limit),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { default_limit: 20 }
    }
}

/// Level selection policy for the presentation layer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// What to do with an out-of-range level request. `strict` never
    /// substitutes another level.
    pub fallback: LevelFallback,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive.
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load config with layered resolution (user → project → env).
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_files(&[Self::user_config_path(), PathBuf::from(PROJECT_CONFIG_FILE)])
    }

    /// Load from explicit TOML files (later files win), then the environment.
    ///
    /// Missing files are skipped.
    pub fn from_files<P: AsRef<Path>>(files: &[P]) -> Result<Self, ConfigError> {
        files
            .iter()
            .fold(Figment::new(), |figment, file| {
                figment.merge(Toml::file(file.as_ref()))
            })
            .merge(Env::prefixed("VADEMECUM_").split("__"))
            .extract()
            .map_err(ConfigError::from)
    }

    /// User config path: ~/.config/vademecum/config.toml (XDG) or platform config dir.
    fn user_config_path() -> PathBuf {
        // Prefer XDG config location (~/.config) on all platforms
        if let Some(home) = dirs::home_dir() {
            let xdg_path = home.join(".config").join("vademecum").join("config.toml");
            if xdg_path.exists() {
                return xdg_path;
            }
        }
        dirs::config_dir()
            .map(|p| p.join("vademecum").join("config.toml"))
            .unwrap_or_default()
    }
}
