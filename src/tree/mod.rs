//! VFS Tree
//!
//! Node types, the arena-backed tree and the seed builder.

pub mod node;
pub mod seed;
pub mod vfs;

pub use node::{Node, NodeKind, NodeMetadata};
pub use seed::{build, load_seed_file};
pub use vfs::Vfs;
