//! Core identifier types for packs and assets.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable node identity, persisted through `PathPart` ids and restored on reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Slot of a node inside a tree arena. Only meaningful for the tree that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeIndex(pub(crate) usize);

/// Opaque handle to an asset known by an asset host.
///
/// Two leaves are the same asset iff their references are equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetRef(pub String);

impl AssetRef {
    pub fn new(value: impl Into<String>) -> Self {
        AssetRef(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short form for display (first 8 characters).
    pub fn short(&self) -> &str {
        let end = self.0.char_indices().nth(8).map(|(i, _)| i).unwrap_or(self.0.len());
        &self.0[..end]
    }
}

impl fmt::Display for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One segment of a persisted leaf path with the stable id of the node it names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathPart {
    pub name: String,
    pub id: NodeId,
}

/// Path separators accepted when splitting virtual paths.
pub const PATH_SEPARATORS: [char; 2] = ['/', '\\'];

/// Split a virtual path into its non-empty segments.
pub fn split_path(path: &str) -> Vec<&str> {
    path.split(|c| PATH_SEPARATORS.contains(&c))
        .filter(|s| !s.is_empty())
        .collect()
}
