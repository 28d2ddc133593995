mod basic;
mod workspace;

pub use basic::BasicConfig;
pub use workspace::{RenameCheck, WorkspaceConfig};

use figment::{
    Figment,
    providers::{Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, sync::LazyLock};

/// Application configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Core server configuration (see `basic` table in config.toml).
    #[serde(default)]
    pub basic: BasicConfig,

    /// Folder and card behaviour (see `workspace` table in config.toml).
    #[serde(default)]
    pub workspace: WorkspaceConfig,
}

const DEFAULT_CONFIG_FILE: &str = "config.toml";

impl Config {
    /// Builds a Figment that merges defaults and a config TOML file.
    pub fn figment() -> Figment {
        let figment = Figment::new().merge(Serialized::defaults(Config::default()));
        if PathBuf::from(DEFAULT_CONFIG_FILE).is_file() {
            figment.merge(Toml::file(DEFAULT_CONFIG_FILE))
        } else {
            figment
        }
    }

    /// Loads configuration by merging defaults and `config.toml` if present,
    /// then panics unless [`Config::validate`] passes.
    pub fn from_optional_toml() -> Self {
        let cfg: Self = Self::figment().extract().unwrap_or_else(|err| {
            panic!("failed to extract configuration (defaults + optional config.toml): {err}")
        });
        if let Err(reason) = cfg.validate() {
            panic!("{reason}");
        }
        cfg
    }

    /// Checks the fields that have no safe default. `basic.gateway_key` is required.
    pub fn validate(&self) -> Result<(), String> {
        if self.basic.gateway_key.trim().is_empty() {
            return Err("basic.gateway_key must be set and non-empty".to_string());
        }
        if self.workspace.max_page_size == 0 {
            return Err("workspace.max_page_size must be greater than zero".to_string());
        }
        if self.workspace.max_bulk_cards == 0 {
            return Err("workspace.max_bulk_cards must be greater than zero".to_string());
        }
        Ok(())
    }
}

/// Global, lazily-initialized configuration instance.
pub static CONFIG: LazyLock<Config> = LazyLock::new(Config::from_optional_toml);
