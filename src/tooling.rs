//! Tooling & Integration Layer
//!
//! Command-line surface: argument parsing, configuration overrides and
//! construction of the session from a seed.

pub mod cli;

pub use cli::{Cli, CliContext};
