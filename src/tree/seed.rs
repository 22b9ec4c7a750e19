//! Seed loading
//!
//! Builds a `Vfs` from the nested JSON seed format:
//!
//! ```json
//! {
//!   "home": { "type": "directory", "children": { "a.txt": "hello" } },
//!   "logo.txt": { "content": "aGk=", "encoding": "base64" }
//! }
//! ```
//!
//! A malformed entry fails the whole load.

use crate::error::VfsError;
use crate::tree::node::{is_valid_permissions, Node};
use crate::tree::vfs::Vfs;
use crate::types::NodeId;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{Map, Value};
use std::path::Path;
use tracing::debug;

const TYPE_KEY: &str = "type";
const CHILDREN_KEY: &str = "children";
const CONTENT_KEY: &str = "content";
const ENCODING_KEY: &str = "encoding";

/// Load and build a seed file.
pub fn load_seed_file(path: &Path) -> Result<Vfs, VfsError> {
    let display = path.display().to_string();
    let text = std::fs::read_to_string(path).map_err(|e| VfsError::SeedIo {
        path: display.clone(),
        reason: e.to_string(),
    })?;
    let value: Value = serde_json::from_str(&text).map_err(|e| VfsError::SeedParse {
        path: display,
        reason: e.to_string(),
    })?;
    build(&value)
}

/// Build a fresh tree whose root children are the entries of `seed`.
pub fn build(seed: &Value) -> Result<Vfs, VfsError> {
    let entries = seed.as_object().ok_or_else(|| VfsError::MalformedSeed {
        entry: "/".to_string(),
        reason: "top-level seed must be an object".to_string(),
    })?;
    let mut vfs = Vfs::new();
    let root = vfs.root();
    build_into(&mut vfs, root, "", entries)?;
    debug!(nodes = vfs.len(), "seed loaded");
    Ok(vfs)
}

/// Recursively attach `entries` under `parent`, in declaration order.
pub fn build_into(
    vfs: &mut Vfs,
    parent: NodeId,
    parent_path: &str,
    entries: &Map<String, Value>,
) -> Result<(), VfsError> {
    for (name, value) in entries {
        let entry = format!("{}/{}", parent_path, name);
        if name.is_empty() || name == "." || name == ".." || name.contains('/') {
            return Err(malformed(&entry, "invalid entry name"));
        }

        match value {
            Value::String(content) => {
                vfs.add_child(parent, Node::file(name.as_str(), content.as_str()))?;
            }
            Value::Object(fields) if is_directory(fields) => {
                let mut node = Node::directory(name.as_str());
                apply_metadata(&mut node, fields, &entry)?;
                let id = vfs.add_child(parent, node)?;
                match fields.get(CHILDREN_KEY) {
                    None | Some(Value::Null) => {}
                    Some(Value::Object(children)) => build_into(vfs, id, &entry, children)?,
                    Some(_) => return Err(malformed(&entry, "children must be an object")),
                }
            }
            Value::Object(fields) => {
                if let Some(kind) = fields.get(TYPE_KEY) {
                    if kind.as_str() != Some("file") {
                        return Err(malformed(&entry, &format!("unknown type {}", kind)));
                    }
                }
                let content = decode_content(fields, &entry)?;
                let mut node = Node::file(name.as_str(), content);
                apply_metadata(&mut node, fields, &entry)?;
                vfs.add_child(parent, node)?;
            }
            other => {
                return Err(malformed(
                    &entry,
                    &format!("expected string or object, found {}", json_kind(other)),
                ));
            }
        }
    }
    Ok(())
}

fn is_directory(fields: &Map<String, Value>) -> bool {
    fields.get(TYPE_KEY).and_then(Value::as_str) == Some("directory")
}

fn decode_content(fields: &Map<String, Value>, entry: &str) -> Result<String, VfsError> {
    let content = match fields.get(CONTENT_KEY) {
        Some(Value::String(content)) => content,
        Some(_) => return Err(malformed(entry, "content must be a string")),
        None => return Err(malformed(entry, "file object has no content")),
    };

    match fields.get(ENCODING_KEY).map(|v| (v, v.as_str())) {
        None | Some((_, Some("utf-8" | "utf8" | "text"))) => Ok(content.clone()),
        Some((_, Some("base64"))) => {
            let bytes = STANDARD
                .decode(content.trim())
                .map_err(|e| encoding_error(entry, e.to_string()))?;
            String::from_utf8(bytes).map_err(|e| encoding_error(entry, e.to_string()))
        }
        Some((raw, _)) => Err(malformed(entry, &format!("unknown encoding {}", raw))),
    }
}

fn apply_metadata(node: &mut Node, fields: &Map<String, Value>, entry: &str) -> Result<(), VfsError> {
    if let Some(value) = fields.get("permissions") {
        let permissions = value
            .as_str()
            .filter(|p| is_valid_permissions(p))
            .ok_or_else(|| malformed(entry, "permissions must be three octal digits"))?;
        node.metadata.permissions = permissions.to_string();
    }
    if let Some(owner) = optional_string(fields, "owner", entry)? {
        node.metadata.owner = owner;
    }
    if let Some(group) = optional_string(fields, "group", entry)? {
        node.metadata.group = group;
    }
    Ok(())
}

fn optional_string(
    fields: &Map<String, Value>,
    key: &str,
    entry: &str,
) -> Result<Option<String>, VfsError> {
    match fields.get(key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(malformed(entry, &format!("{} must be a string", key))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn malformed(entry: &str, reason: &str) -> VfsError {
    VfsError::MalformedSeed {
        entry: entry.to_string(),
        reason: reason.to_string(),
    }
}

fn encoding_error(entry: &str, reason: String) -> VfsError {
    VfsError::EncodingError {
        entry: entry.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_nested_seed() {
        let vfs = build(&json!({
            "home": {"type": "directory", "children": {"a.txt": "hello"}},
            "etc": {"type": "directory"}
        }))
        .unwrap();
        let root = vfs.root();
        let file = vfs.resolve_path(root, "/home/a.txt").unwrap();
        assert_eq!(vfs.node(file).unwrap().content(), "hello");
        let etc = vfs.resolve_path(root, "etc").unwrap();
        assert!(vfs.node(etc).unwrap().is_directory());
        assert!(vfs.is_empty(etc).unwrap());
    }

    #[test]
    fn test_declaration_order_preserved() {
        let vfs = build(&json!({"zeta": "", "alpha": "", "mid": ""})).unwrap();
        let names: Vec<_> = vfs
            .node(vfs.root())
            .unwrap()
            .children()
            .iter()
            .map(|(name, _)| name.clone())
            .collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_base64_content_decoded() {
        let vfs = build(&json!({"hi.txt": {"content": "aGVsbG8gd29ybGQ=", "encoding": "base64"}}))
            .unwrap();
        let id = vfs.resolve_path(vfs.root(), "hi.txt").unwrap();
        let node = vfs.node(id).unwrap();
        assert_eq!(node.content(), "hello world");
        assert_eq!(node.size(), 11);
    }

    #[test]
    fn test_plain_object_content() {
        let vfs = build(&json!({"f": {"content": "plain", "permissions": "600", "owner": "root"}}))
            .unwrap();
        let node = vfs.node(vfs.resolve_path(vfs.root(), "f").unwrap()).unwrap();
        assert_eq!(node.content(), "plain");
        assert_eq!(node.mode_string(), "-rw-------");
        assert_eq!(node.metadata.owner, "root");
    }

    #[test]
    fn test_invalid_base64_is_encoding_error() {
        let err = build(&json!({"bad": {"content": "%%%", "encoding": "base64"}})).unwrap_err();
        assert!(matches!(err, VfsError::EncodingError { ref entry, .. } if entry == "/bad"));
    }

    #[test]
    fn test_non_utf8_base64_is_encoding_error() {
        // 0xff 0xfe
        let err = build(&json!({"bin": {"content": "//4=", "encoding": "base64"}})).unwrap_err();
        assert!(matches!(err, VfsError::EncodingError { .. }));
    }

    #[test]
    fn test_malformed_entries_fail_whole_load() {
        for seed in [
            json!({"n": 42}),
            json!({"n": [1, 2]}),
            json!({"n": null}),
            json!({"n": {"no": "content"}}),
            json!({"n": {"type": "socket", "content": "x"}}),
            json!({"n": {"content": "x", "encoding": "rot13"}}),
            json!({"n": {"type": "directory", "children": "x"}}),
            json!({"n": {"type": "directory", "permissions": "999"}}),
            json!({"a/b": "x"}),
            json!(["not", "an", "object"]),
        ] {
            let err = build(&seed).unwrap_err();
            assert!(
                matches!(err, VfsError::MalformedSeed { .. }),
                "expected MalformedSeed for {seed}, got {err:?}"
            );
        }
    }

    #[test]
    fn test_nested_malformed_entry_names_full_path() {
        let err = build(&json!({
            "home": {"type": "directory", "children": {"user": {"type": "directory", "children": {"x": 1}}}}
        }))
        .unwrap_err();
        assert!(matches!(err, VfsError::MalformedSeed { ref entry, .. } if entry == "/home/user/x"));
    }

    #[test]
    fn test_load_seed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.json");
        std::fs::write(&path, r#"{"readme": "hi"}"#).unwrap();
        let vfs = load_seed_file(&path).unwrap();
        assert!(vfs.resolve_path(vfs.root(), "readme").is_ok());

        let missing = load_seed_file(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(missing, VfsError::SeedIo { .. }));

        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_seed_file(&path).unwrap_err(), VfsError::SeedParse { .. }));
    }
}
