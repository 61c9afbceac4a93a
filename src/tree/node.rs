//! Pack tree node types

use crate::types::{AssetRef, NodeId, NodeIndex};
use serde::{Deserialize, Serialize};

/// Name carried by the root of every pack tree.
pub const ROOT_NAME: &str = "/";

/// One folder or leaf of a pack tree.
///
/// A node is a leaf iff `asset` is set; leaves never have children.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub asset: Option<AssetRef>,
    pub parent: Option<NodeIndex>,
    pub children: Vec<NodeIndex>,
    pub id: NodeId,
}

impl Node {
    pub(crate) fn folder(name: impl Into<String>, parent: Option<NodeIndex>, id: NodeId) -> Self {
        Self {
            name: name.into(),
            asset: None,
            parent,
            children: Vec::new(),
            id,
        }
    }

    pub(crate) fn leaf(
        name: impl Into<String>,
        asset: AssetRef,
        parent: NodeIndex,
        id: NodeId,
    ) -> Self {
        Self {
            name: name.into(),
            asset: Some(asset),
            parent: Some(parent),
            children: Vec::new(),
            id,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.asset.is_some()
    }

    pub fn is_folder(&self) -> bool {
        self.asset.is_none()
    }
}

/// Owned, nested snapshot of a subtree. Used for display and for comparing trees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeView {
    pub name: String,
    pub id: NodeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset: Option<AssetRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeView>,
}

impl NodeView {
    /// Number of leaves in this subtree.
    pub fn leaf_count(&self) -> usize {
        if self.asset.is_some() {
            1
        } else {
            self.children.iter().map(NodeView::leaf_count).sum()
        }
    }

    /// Same view with every id zeroed, for shape-only comparisons.
    pub fn without_ids(&self) -> NodeView {
        NodeView {
            name: self.name.clone(),
            id: NodeId(0),
            asset: self.asset.clone(),
            children: self.children.iter().map(NodeView::without_ids).collect(),
        }
    }
}
