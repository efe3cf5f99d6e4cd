//! Server configuration loaded from TOML.
//!
//! ```toml
//! corpus = "~/docs/operators.json"
//!
//! [index]
//! stemming = true
//! stop_words = true
//! max_results = 50
//!
//! [server]
//! default_limit = 10
//! suggestion_limit = 10
//! ```

use crate::error::Result;
use crate::search::{IndexOptions, IndexOptionsOverride};
use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "OPDOCS_CONFIG";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Corpus file indexed at startup.
    pub corpus: Option<String>,
    /// Overrides applied to the default index options.
    pub index: IndexOptionsOverride,
    pub server: ServerConfig,
}

/// Limits applied by the MCP tools when a request leaves them unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub default_limit: usize,
    pub suggestion_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            default_limit: 10,
            suggestion_limit: 10,
        }
    }
}

impl Config {
    /// Parse a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Invalid config at {}", path.display()))
    }

    /// Locate and load the config.
    ///
    /// Order: `explicit` path, then `$OPDOCS_CONFIG`, then
    /// `<config dir>/opdocs-mcp/config.toml` when it exists, else defaults.
    pub fn discover(explicit: Option<&str>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(&expand_tilde(path));
        }

        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Self::load(&expand_tilde(&path));
        }

        if let Some(path) = default_config_path().filter(|path| path.is_file()) {
            return Self::load(&path);
        }

        tracing::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Default index options with the `[index]` overrides applied.
    pub fn index_options(&self) -> IndexOptions {
        let mut options = IndexOptions::default();
        self.index.apply(&mut options);
        options
    }

    /// Corpus path with `~` expanded.
    pub fn corpus_path(&self) -> Option<PathBuf> {
        self.corpus.as_deref().map(expand_tilde)
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("opdocs-mcp").join("config.toml"))
}

/// Resolve a leading `~` or `~/` against the home directory.
///
/// Paths without one, or with no known home, come back unchanged.
pub fn expand_tilde(path: &str) -> PathBuf {
    let rest = if path == "~" { Some("") } else { path.strip_prefix("~/") };

    match (rest, dirs::home_dir()) {
        (Some(""), Some(home)) => home,
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
