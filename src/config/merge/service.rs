//! MergeService: orchestrates sources and deserializes to ShellConfig.

use crate::config::sources::{environment, file};
use crate::config::ShellConfig;
use crate::error::SetupError;
use config::Config;
use std::path::Path;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Precedence: struct defaults (lowest) -> config file -> environment (highest).
    pub fn load(config_file: Option<&Path>) -> Result<ShellConfig, SetupError> {
        let builder = Config::builder();
        let builder = match config_file {
            Some(path) => file::add_to_builder(builder, path)?,
            None => builder,
        };
        let builder = environment::add_to_builder(builder)?;

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }
}
