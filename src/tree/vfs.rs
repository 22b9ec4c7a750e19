//! Arena-backed VFS tree
//!
//! Every node lives in a slot of `Vfs::nodes`; a directory owns its children
//! through the ids in its child list, and `Node::parent` is a plain id used for
//! `..` and path reconstruction only. Removing a child clears the slots of the
//! whole detached subtree, so no id can outlive the node it names.

use crate::error::VfsError;
use crate::tree::node::{Node, NodeKind};
use crate::types::NodeId;
use chrono::Local;
use tracing::debug;

/// In-memory virtual filesystem rooted at a single unnamed directory.
#[derive(Debug, Clone)]
pub struct Vfs {
    nodes: Vec<Option<Node>>,
    root: NodeId,
}

impl Default for Vfs {
    fn default() -> Self {
        Self::new()
    }
}

impl Vfs {
    /// Create a tree holding only the root directory.
    pub fn new() -> Self {
        Vfs {
            nodes: vec![Some(Node::directory(""))],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Borrow a live node.
    pub fn node(&self, id: NodeId) -> Result<&Node, VfsError> {
        self.nodes
            .get(id.0)
            .and_then(Option::as_ref)
            .ok_or(VfsError::StaleNode(id.0))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, VfsError> {
        self.nodes
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(VfsError::StaleNode(id.0))
    }

    /// True while `id` names a node reachable from the root.
    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_ok()
    }

    /// Number of live nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self, id: NodeId) -> Result<bool, VfsError> {
        Ok(self.node(id)?.children().is_empty())
    }

    /// Attach `child` under `parent` and return its id.
    ///
    /// The child is attached as a leaf: any child ids it carries are dropped.
    /// An existing entry with the same name is replaced and its subtree reclaimed.
    pub fn add_child(&mut self, parent: NodeId, mut child: Node) -> Result<NodeId, VfsError> {
        if !self.node(parent)?.is_directory() {
            return Err(VfsError::NotADirectory(self.get_path(parent)?));
        }

        if let NodeKind::Directory { children } = &mut child.kind {
            children.clear();
        }
        child.parent = Some(parent);
        let name = child.name.clone();
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(child));

        let displaced = {
            let parent_node = self.node_mut(parent)?;
            parent_node.metadata.modified = Local::now();
            match &mut parent_node.kind {
                NodeKind::Directory { children } => {
                    match children.iter().position(|(existing, _)| *existing == name) {
                        Some(index) => Some(std::mem::replace(&mut children[index].1, id)),
                        None => {
                            children.push((name.clone(), id));
                            None
                        }
                    }
                }
                NodeKind::File { .. } => None,
            }
        };
        if let Some(old) = displaced {
            debug!(name = %name, "replacing existing child");
            self.reclaim(old);
        }

        Ok(id)
    }

    /// Detach `name` from `parent`. Absent names are not an error.
    pub fn remove_child(&mut self, parent: NodeId, name: &str) -> Result<(), VfsError> {
        let removed = {
            let parent_node = self.node_mut(parent)?;
            let removed = match &mut parent_node.kind {
                NodeKind::Directory { children } => children
                    .iter()
                    .position(|(existing, _)| existing == name)
                    .map(|index| children.remove(index).1),
                NodeKind::File { .. } => None,
            };
            if removed.is_some() {
                parent_node.metadata.modified = Local::now();
            }
            removed
        };
        if let Some(id) = removed {
            debug!(name, "detached child");
            self.reclaim(id);
        }
        Ok(())
    }

    /// Free the slots of `id` and everything below it.
    fn reclaim(&mut self, id: NodeId) {
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if let Some(node) = self.nodes.get_mut(next.0).and_then(Option::take) {
                pending.extend(node.children().iter().map(|(_, child)| *child));
            }
        }
    }

    /// Resolve `path` from `from`, or from the root when it starts with `/`.
    ///
    /// Empty segments are skipped, `.` stays put and `..` climbs (the root is
    /// its own parent). Any other segment must name an existing child; nothing
    /// is ever created.
    pub fn resolve_path(&self, from: NodeId, path: &str) -> Result<NodeId, VfsError> {
        let mut current = if path.starts_with('/') {
            self.root
        } else {
            self.node(from)?;
            from
        };

        for segment in path.split('/').filter(|segment| !segment.is_empty()) {
            match segment {
                "." => {}
                ".." => {
                    if let Some(parent) = self.node(current)?.parent {
                        current = parent;
                    }
                }
                name => {
                    current = self
                        .node(current)?
                        .child(name)
                        .ok_or_else(|| VfsError::PathNotFound(path.to_string()))?;
                }
            }
        }

        debug!(path, resolved = %current, "resolved path");
        Ok(current)
    }

    /// Absolute path of `id`, `/` for the root.
    pub fn get_path(&self, id: NodeId) -> Result<String, VfsError> {
        let mut names = Vec::new();
        let mut current = self.node(id)?;
        while let Some(parent) = current.parent {
            names.push(current.name.as_str());
            current = self.node(parent)?;
        }
        if names.is_empty() {
            return Ok("/".to_string());
        }
        names.reverse();
        Ok(format!("/{}", names.join("/")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> (Vfs, NodeId, NodeId, NodeId) {
        let mut vfs = Vfs::new();
        let root = vfs.root();
        let home = vfs.add_child(root, Node::directory("home")).unwrap();
        let user = vfs.add_child(home, Node::directory("user")).unwrap();
        let file = vfs.add_child(user, Node::file("notes.txt", "hi")).unwrap();
        (vfs, home, user, file)
    }

    #[test]
    fn test_resolve_absolute_and_relative() {
        let (vfs, home, user, file) = sample();
        let root = vfs.root();
        assert_eq!(vfs.resolve_path(root, "/home/user").unwrap(), user);
        assert_eq!(vfs.resolve_path(home, "user/notes.txt").unwrap(), file);
        assert_eq!(vfs.resolve_path(user, "/").unwrap(), root);
        assert_eq!(vfs.resolve_path(user, "").unwrap(), user);
    }

    #[test]
    fn test_resolve_dots_and_slashes() {
        let (vfs, home, user, _) = sample();
        let root = vfs.root();
        assert_eq!(vfs.resolve_path(user, "..").unwrap(), home);
        assert_eq!(vfs.resolve_path(user, "../..").unwrap(), root);
        assert_eq!(vfs.resolve_path(root, "..").unwrap(), root);
        assert_eq!(vfs.resolve_path(root, "/../../home").unwrap(), home);
        assert_eq!(vfs.resolve_path(root, "home//user/").unwrap(), user);
        assert_eq!(vfs.resolve_path(root, "./home/./user/.").unwrap(), user);
    }

    #[test]
    fn test_resolve_missing_reports_given_path() {
        let (vfs, _, _, _) = sample();
        let err = vfs.resolve_path(vfs.root(), "home/nobody/x").unwrap_err();
        assert_eq!(err, VfsError::PathNotFound("home/nobody/x".to_string()));
        let nodes_before = vfs.len();
        assert!(vfs.resolve_path(vfs.root(), "home/nobody/x").is_err());
        assert_eq!(vfs.len(), nodes_before);
    }

    #[test]
    fn test_resolve_through_file_fails() {
        let (vfs, _, _, _) = sample();
        assert!(matches!(
            vfs.resolve_path(vfs.root(), "/home/user/notes.txt/x"),
            Err(VfsError::PathNotFound(_))
        ));
    }

    #[test]
    fn test_get_path() {
        let (vfs, home, _, file) = sample();
        assert_eq!(vfs.get_path(vfs.root()).unwrap(), "/");
        assert_eq!(vfs.get_path(home).unwrap(), "/home");
        assert_eq!(vfs.get_path(file).unwrap(), "/home/user/notes.txt");
    }

    #[test]
    fn test_add_child_to_file_fails() {
        let (mut vfs, _, _, file) = sample();
        let err = vfs.add_child(file, Node::file("x", "")).unwrap_err();
        assert_eq!(err, VfsError::NotADirectory("/home/user/notes.txt".to_string()));
    }

    #[test]
    fn test_add_child_overwrites_and_reclaims() {
        let (mut vfs, home, user, file) = sample();
        let replacement = vfs.add_child(home, Node::file("user", "now a file")).unwrap();
        assert_eq!(vfs.resolve_path(home, "user").unwrap(), replacement);
        assert!(!vfs.contains(user));
        assert!(!vfs.contains(file));
        assert_eq!(vfs.node(home).unwrap().children().len(), 1);
    }

    #[test]
    fn test_add_child_updates_modified() {
        let (mut vfs, home, _, _) = sample();
        let before = vfs.node(home).unwrap().metadata.modified;
        vfs.add_child(home, Node::file("later", "")).unwrap();
        assert!(vfs.node(home).unwrap().metadata.modified >= before);
    }

    #[test]
    fn test_remove_child_touches_modified_only_on_removal() {
        let (mut vfs, home, _, _) = sample();
        let past = Local.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
        vfs.node_mut(home).unwrap().metadata.modified = past;

        vfs.remove_child(home, "missing").unwrap();
        assert_eq!(vfs.node(home).unwrap().metadata.modified, past);

        vfs.remove_child(home, "user").unwrap();
        assert!(vfs.node(home).unwrap().metadata.modified > past);
    }

    #[test]
    fn test_remove_child() {
        let (mut vfs, home, user, file) = sample();
        vfs.remove_child(home, "user").unwrap();
        assert!(vfs.is_empty(home).unwrap());
        assert!(!vfs.contains(user));
        assert!(!vfs.contains(file));
        assert_eq!(vfs.node(file).unwrap_err(), VfsError::StaleNode(file.index()));
        // absent name is a no-op
        vfs.remove_child(home, "user").unwrap();
        assert_eq!(vfs.len(), 2);
    }

    #[test]
    fn test_is_empty() {
        let (vfs, home, user, file) = sample();
        assert!(!vfs.is_empty(home).unwrap());
        assert!(!vfs.is_empty(user).unwrap());
        assert!(vfs.is_empty(file).unwrap());
    }
}
