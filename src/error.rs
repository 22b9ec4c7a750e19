//! Error types
//!
//! `VfsError` covers the tree and seed loading, `SetupError` configuration and
//! logging, and `ShellError` everything a command can report. Command errors
//! are values: the interpreter's dispatch boundary turns them into text.

use thiserror::Error;

/// Errors raised by the VFS tree and the seed builder.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VfsError {
    #[error("{0}: No such file or directory")]
    PathNotFound(String),

    #[error("{0}: Not a directory")]
    NotADirectory(String),

    #[error("malformed seed entry '{entry}': {reason}")]
    MalformedSeed { entry: String, reason: String },

    #[error("cannot decode content of '{entry}': {reason}")]
    EncodingError { entry: String, reason: String },

    #[error("cannot read seed file {path}: {reason}")]
    SeedIo { path: String, reason: String },

    #[error("seed file {path} is not valid JSON: {reason}")]
    SeedParse { path: String, reason: String },

    /// A handle that no longer refers to a live node (its subtree was removed).
    #[error("stale node handle {0}")]
    StaleNode(usize),
}

/// Startup failures outside the tree: configuration and logging setup.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("logging error: {0}")]
    Logging(String),
}

impl From<config::ConfigError> for SetupError {
    fn from(err: config::ConfigError) -> Self {
        SetupError::Config(err.to_string())
    }
}

/// Errors a shell command reports. None of them end the session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShellError {
    #[error("{0}: No such file or directory")]
    PathNotFound(String),

    #[error("{0}: Not a directory")]
    NotADirectory(String),

    #[error("{0}: Is a directory")]
    IsADirectory(String),

    #[error("failed to remove '{0}': Directory not empty")]
    NotEmpty(String),

    #[error("failed to remove '{0}': Cannot remove root directory")]
    CannotRemoveRoot(String),

    #[error("failed to remove '{0}': Cannot remove current directory")]
    CannotRemoveCurrent(String),

    #[error("too many arguments")]
    TooManyArguments,

    #[error("{0}: numeric argument required")]
    InvalidExitCode(String),

    #[error("missing operand")]
    MissingOperand,

    #[error("invalid option -- '{0}'")]
    InvalidOption(String),

    #[error("unterminated {0} quote")]
    UnterminatedQuote(char),

    #[error("{0}: command not found")]
    CommandNotFound(String),

    #[error(transparent)]
    Vfs(VfsError),
}

impl From<VfsError> for ShellError {
    fn from(err: VfsError) -> Self {
        match err {
            VfsError::PathNotFound(path) => ShellError::PathNotFound(path),
            VfsError::NotADirectory(path) => ShellError::NotADirectory(path),
            other => ShellError::Vfs(other),
        }
    }
}
