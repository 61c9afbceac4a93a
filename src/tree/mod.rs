//! Pack tree
//!
//! The virtual folder hierarchy of a pack. Nodes live in an arena owned by
//! `PackTree`; parent and child links are arena indices, and every node also
//! carries a stable `NodeId` that survives flatten/rebuild.

mod edit;
pub mod node;

pub use edit::DEFAULT_FOLDER_NAME;
pub use node::{Node, NodeView, ROOT_NAME};

use crate::error::TreeError;
use crate::types::{split_path, AssetRef, NodeId, NodeIndex, PathPart};

/// Arena-backed pack tree with a single root folder named `/`.
#[derive(Debug, Clone)]
pub struct PackTree {
    nodes: Vec<Option<Node>>,
    free: Vec<usize>,
    root: NodeIndex,
    next_id: u64,
}

impl Default for PackTree {
    fn default() -> Self {
        Self::new()
    }
}

impl PackTree {
    /// Create a tree holding only the root folder.
    pub fn new() -> Self {
        let root = Node::folder(ROOT_NAME, None, NodeId(0));
        Self {
            nodes: vec![Some(root)],
            free: Vec::new(),
            root: NodeIndex(0),
            next_id: 1,
        }
    }

    pub fn root(&self) -> NodeIndex {
        self.root
    }

    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        self.nodes.get(index.0).and_then(Option::as_ref)
    }

    pub fn node(&self, index: NodeIndex) -> Result<&Node, TreeError> {
        self.get(index)
            .ok_or_else(|| TreeError::NodeNotFound(format!("#{}", index.0)))
    }

    fn node_mut(&mut self, index: NodeIndex) -> Result<&mut Node, TreeError> {
        self.nodes
            .get_mut(index.0)
            .and_then(Option::as_mut)
            .ok_or_else(|| TreeError::NodeNotFound(format!("#{}", index.0)))
    }

    /// Children of a node in order; empty for leaves and unknown indices.
    pub fn children(&self, index: NodeIndex) -> &[NodeIndex] {
        self.get(index).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Number of live nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children(self.root).is_empty()
    }

    fn next_node_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Keep the id counter ahead of ids restored from persisted path parts.
    fn observe_id(&mut self, id: NodeId) {
        if id.0 >= self.next_id {
            self.next_id = id.0 + 1;
        }
    }

    fn alloc(&mut self, node: Node) -> NodeIndex {
        match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = Some(node);
                NodeIndex(slot)
            }
            None => {
                self.nodes.push(Some(node));
                NodeIndex(self.nodes.len() - 1)
            }
        }
    }

    /// Append a fresh folder under `parent` without any name check.
    fn attach_folder(&mut self, parent: NodeIndex, name: &str) -> Result<NodeIndex, TreeError> {
        let id = self.next_node_id();
        let index = self.alloc(Node::folder(name, Some(parent), id));
        self.node_mut(parent)?.children.push(index);
        Ok(index)
    }

    /// Child folder of `parent` with exactly this name.
    pub fn find_child_folder(&self, parent: NodeIndex, name: &str) -> Option<NodeIndex> {
        self.children(parent).iter().copied().find(|&c| {
            self.get(c)
                .map(|n| n.is_folder() && n.name == name)
                .unwrap_or(false)
        })
    }

    /// Child of `parent` referencing `asset`.
    pub fn find_child_asset(&self, parent: NodeIndex, asset: &AssetRef) -> Option<NodeIndex> {
        self.children(parent)
            .iter()
            .copied()
            .find(|&c| self.get(c).and_then(|n| n.asset.as_ref()) == Some(asset))
    }

    /// Insert a leaf for `asset` at `path` below `start`, creating missing folders.
    ///
    /// When `parts` is given (reload), the node at each depth takes the id of the
    /// matching part, and a new leaf takes the id of the last part. Inserting an
    /// asset already present under the target folder is a no-op. Returns the
    /// leaf's index.
    pub fn insert_path(
        &mut self,
        path: &str,
        asset: AssetRef,
        start: NodeIndex,
        parts: Option<&[PathPart]>,
    ) -> Result<NodeIndex, TreeError> {
        let segments = split_path(path);
        let Some((leaf_name, folders)) = segments.split_last() else {
            return Err(TreeError::EmptyPath(path.to_string()));
        };
        if self.node(start)?.is_leaf() {
            return Err(TreeError::NotAFolder(self.path_of(start)));
        }

        let current = self.descend(start, folders, parts)?;

        if let Some(existing) = self.find_child_asset(current, &asset) {
            return Ok(existing);
        }

        let id = match parts.and_then(|p| p.last()) {
            Some(part) => {
                self.observe_id(part.id);
                part.id
            }
            None => self.next_node_id(),
        };
        let leaf = self.alloc(Node::leaf(*leaf_name, asset, current, id));
        self.node_mut(current)?.children.push(leaf);
        Ok(leaf)
    }

    /// Walk `folders` down from `start`, creating missing folders and taking
    /// ids from `parts` by depth.
    fn descend(
        &mut self,
        start: NodeIndex,
        folders: &[&str],
        parts: Option<&[PathPart]>,
    ) -> Result<NodeIndex, TreeError> {
        let mut current = start;
        for (depth, segment) in folders.iter().enumerate() {
            current = match self.find_child_folder(current, segment) {
                Some(found) => found,
                None => self.attach_folder(current, segment)?,
            };
            if let Some(part) = parts.and_then(|p| p.get(depth)) {
                self.node_mut(current)?.id = part.id;
                self.observe_id(part.id);
            }
        }
        Ok(current)
    }

    /// Make sure the folder chain named by `parts` exists below the root,
    /// restoring each folder's id. Returns the innermost folder.
    pub fn restore_folder_path(&mut self, parts: &[PathPart]) -> Result<NodeIndex, TreeError> {
        if parts.is_empty() {
            return Err(TreeError::EmptyPath(String::new()));
        }
        let names: Vec<&str> = parts.iter().map(|p| p.name.as_str()).collect();
        let root = self.root();
        self.descend(root, &names, Some(parts))
    }

    /// Delete a node and everything below it, children first.
    ///
    /// The root itself stays in place; deleting it empties the tree.
    pub fn delete_entry(&mut self, index: NodeIndex) -> Result<(), TreeError> {
        let children = self.node(index)?.children.clone();
        for child in children {
            self.delete_entry(child)?;
        }

        if let Some(parent) = self.node(index)?.parent {
            self.node_mut(parent)?.children.retain(|&c| c != index);
            self.nodes[index.0] = None;
            self.free.push(index.0);
        }
        Ok(())
    }

    /// Resolve a slash path from the root. Folders are matched first, then leaves.
    pub fn find_path(&self, path: &str) -> Option<NodeIndex> {
        let mut current = self.root;
        for segment in split_path(path) {
            let parent = current;
            current = self.find_child_folder(parent, segment).or_else(|| {
                self.children(parent)
                    .iter()
                    .copied()
                    .find(|&c| self.get(c).map(|n| n.name == segment).unwrap_or(false))
            })?;
        }
        Some(current)
    }

    /// Slash path of a node from the root; `/` for the root.
    pub fn path_of(&self, index: NodeIndex) -> String {
        let mut names = Vec::new();
        let mut cursor = Some(index);
        while let Some(i) = cursor {
            match self.get(i) {
                Some(node) if node.parent.is_some() => {
                    names.push(node.name.as_str());
                    cursor = node.parent;
                }
                _ => break,
            }
        }
        if names.is_empty() {
            return ROOT_NAME.to_string();
        }
        names.reverse();
        names.join("/")
    }

    /// True if `ancestor` is `index` or lies on its parent chain.
    pub fn is_ancestor_or_self(&self, ancestor: NodeIndex, index: NodeIndex) -> bool {
        let mut cursor = Some(index);
        while let Some(i) = cursor {
            if i == ancestor {
                return true;
            }
            cursor = self.get(i).and_then(|n| n.parent);
        }
        false
    }

    /// Count of leaves in the whole tree.
    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().flatten().filter(|n| n.is_leaf()).count()
    }

    /// Nested snapshot of the whole tree.
    pub fn view(&self) -> NodeView {
        self.view_of(self.root)
    }

    pub fn view_of(&self, index: NodeIndex) -> NodeView {
        match self.get(index) {
            Some(node) => NodeView {
                name: node.name.clone(),
                id: node.id,
                asset: node.asset.clone(),
                children: node.children.iter().map(|&c| self.view_of(c)).collect(),
            },
            None => NodeView {
                name: String::new(),
                id: NodeId(0),
                asset: None,
                children: Vec::new(),
            },
        }
    }
}
