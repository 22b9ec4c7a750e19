//! CLI Tooling
//!
//! Command-line interface for vshell. Parses startup options, folds them into
//! the loaded configuration and builds the session that serves commands.

use crate::config::{ConfigLoader, ShellConfig};
use crate::error::{SetupError, VfsError};
use crate::shell::{Interpreter, Session};
use crate::tree::{load_seed_file, Vfs};
use anyhow::Context;
use clap::Parser;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// vshell - POSIX-like shell over an in-memory virtual filesystem
#[derive(Parser, Debug)]
#[command(name = "vshell")]
#[command(about = "Toy shell over an in-memory, JSON-seeded virtual filesystem")]
#[command(version)]
pub struct Cli {
    /// Display name of the VFS, shown in the prompt
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// JSON seed file describing the initial tree (default: empty root)
    #[arg(long, short = 's')]
    pub seed: Option<PathBuf>,

    /// Run commands from this file instead of reading the terminal
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, default_value = "false")]
    pub debug: bool,

    /// Configuration file path
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Load configuration and apply command-line overrides on top.
    pub fn load_config(&self) -> Result<ShellConfig, SetupError> {
        let config = match &self.config {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load()?,
        };
        Ok(self.apply_overrides(config))
    }

    /// Fold flags into `config`. `--log-level` beats `--debug`.
    pub fn apply_overrides(&self, mut config: ShellConfig) -> ShellConfig {
        if let Some(name) = &self.name {
            config.name = name.clone();
        }
        if self.debug {
            config.logging.level = "debug".to_string();
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.logging.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            config.logging.output = output.clone();
        }
        if let Some(file) = &self.log_file {
            config.logging.file = Some(file.clone());
        }
        config
    }
}

/// A ready session plus the configuration it was built from.
pub struct CliContext {
    config: ShellConfig,
    session: Session,
}

impl CliContext {
    /// Build the tree (from `seed` when given) and the session around it.
    pub fn new(config: ShellConfig, seed: Option<&Path>) -> Result<Self, VfsError> {
        let vfs = match seed {
            Some(path) => load_seed_file(path)?,
            None => Vfs::new(),
        };
        info!(name = %config.name, nodes = vfs.len(), "vfs ready");
        let interpreter = Interpreter::new(vfs, config.identity());
        let session = Session::new(config.name.clone(), interpreter);
        Ok(Self { config, session })
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Run the script when given, otherwise an interactive session.
    /// Returns the process exit code.
    pub fn run(&mut self, script: Option<&Path>) -> anyhow::Result<i32> {
        match script {
            Some(path) => {
                let stdout = io::stdout();
                let stderr = io::stderr();
                self.run_script_file(path, &mut stdout.lock(), &mut stderr.lock())
            }
            None => self.session.run_interactive(),
        }
    }

    /// Run every line of `path` through the session.
    pub fn run_script_file<W: Write, E: Write>(
        &mut self,
        path: &Path,
        out: &mut W,
        err: &mut E,
    ) -> anyhow::Result<i32> {
        let file = File::open(path)
            .with_context(|| format!("cannot open script {}", path.display()))?;
        let code = self
            .session
            .run_script(BufReader::new(file), out, err)
            .with_context(|| format!("script {} failed", path.display()))?;
        Ok(code)
    }
}
