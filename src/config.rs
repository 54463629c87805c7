//! Configuration System
//!
//! Provides hierarchical configuration loading from:
//! - remote.toml (default configuration)
//! - remote.local.toml (git-ignored local overrides)
//! - Environment variables (REMOTE_* prefix)
//!
//! The only setting the engine's collaborator layer consumes is the
//! history file path, so `REMOTE_HISTORY_PATH` overrides everything:
//!
//! ```bash
//! REMOTE_HISTORY_PATH=/custom/path/history.json
//! ```

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration struct
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Where the host application persists session history.
    #[serde(default = "default_history_path")]
    pub history_path: PathBuf,
}

fn default_history_path() -> PathBuf {
    PathBuf::from("remote-history.json")
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Merges in order:
    /// 1. remote.toml (base configuration)
    /// 2. remote.local.toml (local overrides, git-ignored)
    /// 3. Environment variables (REMOTE_* prefix)
    pub fn load() -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Toml::file("remote.toml"))
            .merge(Toml::file("remote.local.toml"))
            .merge(Env::prefixed("REMOTE_"))
            .extract()
    }

    /// Load configuration from a specific file path
    pub fn from_file(path: &str) -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("REMOTE_"))
            .extract()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            history_path: default_history_path(),
        }
    }
}
