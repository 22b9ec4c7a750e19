//! vshell: a toy shell over an in-memory virtual filesystem
//!
//! The tree is seeded from JSON and lives only in memory; commands such as
//! `ls`, `cd`, `cat` and `rmdir` read and mutate it through a single
//! interpreter that tracks the working directory.

pub mod config;
pub mod error;
pub mod logging;
pub mod shell;
pub mod tooling;
pub mod tree;
pub mod types;
