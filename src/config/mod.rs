//! Configuration
//!
//! `ShellConfig` is layered with the `config` crate: struct defaults, an
//! optional config file, then `VSHELL__*` environment variables. CLI flags are
//! applied on top by the tooling layer.

pub mod facade;
pub mod merge;
pub mod sources;

pub use facade::ConfigLoader;

use crate::logging::LoggingConfig;
use crate::shell::Identity;
use serde::{Deserialize, Serialize};

fn default_name() -> String {
    "myvfs".to_string()
}

/// Shell configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShellConfig {
    /// Display name of the VFS, shown in the prompt
    #[serde(default = "default_name")]
    pub name: String,

    /// User shown by `who`; falls back to `$USER`
    #[serde(default)]
    pub user: Option<String>,

    /// Host shown by `who`; falls back to `$HOSTNAME`
    #[serde(default)]
    pub host: Option<String>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            user: None,
            host: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl ShellConfig {
    /// Session identity: configured values first, then the environment.
    pub fn identity(&self) -> Identity {
        let fallback = Identity::default();
        Identity {
            user: self
                .user
                .clone()
                .or_else(|| non_empty_env("USER"))
                .unwrap_or(fallback.user),
            host: self
                .host
                .clone()
                .or_else(|| non_empty_env("HOSTNAME"))
                .unwrap_or(fallback.host),
        }
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}
