//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::ShellConfig;
use crate::error::SetupError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from defaults and environment.
    pub fn load() -> Result<ShellConfig, SetupError> {
        MergeService::load(None)
    }

    /// Load configuration from a specific file with environment overlay.
    pub fn load_from_file(path: &Path) -> Result<ShellConfig, SetupError> {
        MergeService::load(Some(path))
    }
}
