//! Core types shared by the tree and the interpreter.

use std::fmt;

/// NodeId: index of a node slot in the VFS arena.
///
/// Slots are never reused, so a handle to a removed node stays invalid instead
/// of silently pointing at a newer node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
