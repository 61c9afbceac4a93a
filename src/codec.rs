//! Flatten/rebuild codec
//!
//! A pack tree is not persisted as a tree. Before saving it is flattened into
//! one `FileEntry` per leaf, each carrying its full path and the stable id of
//! every node on that path; on load the tree is rebuilt by replaying the
//! entries through path insertion. Folders with nothing below them have no
//! leaf to carry them, so they are kept as separate `FolderEntry` records and
//! restored after the leaves.

use crate::error::TreeError;
use crate::tree::PackTree;
use crate::types::{AssetRef, NodeIndex, PathPart};
use serde::{Deserialize, Serialize};

/// Persisted form of one leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Slash-separated path from the pack root to the leaf.
    pub path: String,
    pub asset: AssetRef,
    /// Pre-build location of the asset; set only while the pack is built.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_path: Option<String>,
    /// One `{name, id}` per segment, root to leaf.
    pub path_part: Vec<PathPart>,
}

/// Persisted form of a folder with no children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderEntry {
    pub path: String,
    pub path_part: Vec<PathPart>,
}

/// Flatten a tree into entries, depth-first pre-order.
///
/// Folders with no leaves below them produce no entries.
pub fn flatten(tree: &PackTree) -> Vec<FileEntry> {
    let mut entries = Vec::new();
    let mut stack = Vec::new();
    for &child in tree.children(tree.root()) {
        flatten_node(tree, child, "", &mut stack, &mut entries);
    }
    entries
}

fn flatten_node(
    tree: &PackTree,
    index: NodeIndex,
    prefix: &str,
    stack: &mut Vec<PathPart>,
    out: &mut Vec<FileEntry>,
) {
    let Some(node) = tree.get(index) else {
        return;
    };
    let mut full_path = format!("{}{}", prefix, node.name);
    stack.push(PathPart {
        name: node.name.clone(),
        id: node.id,
    });

    match &node.asset {
        Some(asset) => out.push(FileEntry {
            path: full_path,
            path_part: stack.clone(),
            original_path: None,
            asset: asset.clone(),
        }),
        None => {
            full_path.push('/');
            for &child in &node.children {
                flatten_node(tree, child, &full_path, stack, out);
            }
        }
    }

    stack.pop();
}

/// Rebuild a tree from persisted entries, restoring stable ids.
pub fn rebuild(entries: &[FileEntry]) -> Result<PackTree, TreeError> {
    let mut tree = PackTree::new();
    let root = tree.root();
    for entry in entries {
        tree.insert_path(
            &entry.path,
            entry.asset.clone(),
            root,
            Some(entry.path_part.as_slice()),
        )?;
    }
    Ok(tree)
}

/// Every childless folder below the root, depth-first pre-order.
pub fn empty_folders(tree: &PackTree) -> Vec<FolderEntry> {
    let mut folders = Vec::new();
    let mut stack = Vec::new();
    for &child in tree.children(tree.root()) {
        collect_empty(tree, child, &mut stack, &mut folders);
    }
    folders
}

fn collect_empty(
    tree: &PackTree,
    index: NodeIndex,
    stack: &mut Vec<PathPart>,
    out: &mut Vec<FolderEntry>,
) {
    let Some(node) = tree.get(index) else {
        return;
    };
    if node.is_leaf() {
        return;
    }
    stack.push(PathPart {
        name: node.name.clone(),
        id: node.id,
    });
    if node.children.is_empty() {
        let names: Vec<&str> = stack.iter().map(|p| p.name.as_str()).collect();
        out.push(FolderEntry {
            path: names.join("/"),
            path_part: stack.clone(),
        });
    }
    for &child in &node.children {
        collect_empty(tree, child, stack, out);
    }
    stack.pop();
}

/// Put persisted empty folders back into a rebuilt tree.
///
/// Folders already present are reused. Restored folders are appended after
/// their parent's existing children.
pub fn restore_folders(tree: &mut PackTree, folders: &[FolderEntry]) -> Result<(), TreeError> {
    for folder in folders {
        if folder.path_part.is_empty() {
            return Err(TreeError::EmptyPath(folder.path.clone()));
        }
        tree.restore_folder_path(&folder.path_part)?;
    }
    Ok(())
}
