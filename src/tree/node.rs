//! Filesystem node types and display metadata

use crate::types::NodeId;
use chrono::{DateTime, Local};

/// Nominal size reported for every directory, independent of its contents.
pub const DIRECTORY_SIZE: u64 = 4096;

pub const DEFAULT_DIR_PERMISSIONS: &str = "755";
pub const DEFAULT_FILE_PERMISSIONS: &str = "644";
pub const DEFAULT_OWNER: &str = "user";
pub const DEFAULT_GROUP: &str = "users";

/// Node payload. A file cannot hold children, so the "files have no
/// children" invariant is carried by the type.
#[derive(Debug, Clone)]
pub enum NodeKind {
    Directory {
        /// (name, child) in insertion order; names are unique.
        children: Vec<(String, NodeId)>,
    },
    File {
        content: String,
    },
}

/// Display-only metadata. Nothing in the shell enforces permissions.
#[derive(Debug, Clone)]
pub struct NodeMetadata {
    pub permissions: String,
    pub owner: String,
    pub group: String,
    pub created: DateTime<Local>,
    pub modified: DateTime<Local>,
}

impl NodeMetadata {
    fn with_permissions(permissions: &str) -> Self {
        let now = Local::now();
        Self {
            permissions: permissions.to_string(),
            owner: DEFAULT_OWNER.to_string(),
            group: DEFAULT_GROUP.to_string(),
            created: now,
            modified: now,
        }
    }
}

/// A single file or directory entry.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub metadata: NodeMetadata,
}

impl Node {
    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Directory {
                children: Vec::new(),
            },
            parent: None,
            metadata: NodeMetadata::with_permissions(DEFAULT_DIR_PERMISSIONS),
        }
    }

    pub fn file(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::File {
                content: content.into(),
            },
            parent: None,
            metadata: NodeMetadata::with_permissions(DEFAULT_FILE_PERMISSIONS),
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self.kind, NodeKind::Directory { .. })
    }

    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// File content; empty for directories.
    pub fn content(&self) -> &str {
        match &self.kind {
            NodeKind::File { content } => content,
            NodeKind::Directory { .. } => "",
        }
    }

    /// Children in insertion order; always empty for files.
    pub fn children(&self) -> &[(String, NodeId)] {
        match &self.kind {
            NodeKind::Directory { children } => children,
            NodeKind::File { .. } => &[],
        }
    }

    pub fn child(&self, name: &str) -> Option<NodeId> {
        self.children()
            .iter()
            .find(|(child_name, _)| child_name == name)
            .map(|(_, id)| *id)
    }

    /// Byte length of the content for files, a fixed nominal value for directories.
    pub fn size(&self) -> u64 {
        match &self.kind {
            NodeKind::File { content } => content.len() as u64,
            NodeKind::Directory { .. } => DIRECTORY_SIZE,
        }
    }

    /// `ls -l` style mode string, e.g. `drwxr-xr-x`.
    pub fn mode_string(&self) -> String {
        let mut mode = String::with_capacity(10);
        mode.push(if self.is_directory() { 'd' } else { '-' });
        for digit in self.metadata.permissions.chars() {
            let bits = digit.to_digit(8).unwrap_or(0);
            mode.push(if bits & 4 != 0 { 'r' } else { '-' });
            mode.push(if bits & 2 != 0 { 'w' } else { '-' });
            mode.push(if bits & 1 != 0 { 'x' } else { '-' });
        }
        mode
    }
}

/// True when `permissions` is exactly three octal digits.
pub fn is_valid_permissions(permissions: &str) -> bool {
    permissions.len() == 3 && permissions.chars().all(|c| c.is_digit(8))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_string_defaults() {
        assert_eq!(Node::directory("d").mode_string(), "drwxr-xr-x");
        assert_eq!(Node::file("f", "x").mode_string(), "-rw-r--r--");
    }

    #[test]
    fn test_mode_string_custom() {
        let mut node = Node::file("secret", "");
        node.metadata.permissions = "600".to_string();
        assert_eq!(node.mode_string(), "-rw-------");
        node.metadata.permissions = "777".to_string();
        assert_eq!(node.mode_string(), "-rwxrwxrwx");
    }

    #[test]
    fn test_size() {
        assert_eq!(Node::file("f", "hello").size(), 5);
        assert_eq!(Node::file("f", "héllo").size(), 6);
        assert_eq!(Node::directory("d").size(), DIRECTORY_SIZE);
    }

    #[test]
    fn test_file_has_no_children() {
        let file = Node::file("f", "x");
        assert!(file.children().is_empty());
        assert_eq!(file.child("anything"), None);
        assert_eq!(Node::directory("d").content(), "");
    }

    #[test]
    fn test_is_valid_permissions() {
        assert!(is_valid_permissions("755"));
        assert!(is_valid_permissions("000"));
        assert!(!is_valid_permissions("758"));
        assert!(!is_valid_permissions("75"));
        assert!(!is_valid_permissions("rwx"));
    }
}
