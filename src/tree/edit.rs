//! Interactive edits on a pack tree: new folders, renames and moves.

use super::PackTree;
use crate::error::TreeError;
use crate::types::{NodeIndex, PATH_SEPARATORS};

/// Name given to folders created without an explicit name.
pub const DEFAULT_FOLDER_NAME: &str = "New Folder";

fn validate_segment(name: &str) -> Result<(), TreeError> {
    if name.trim().is_empty() || name.contains(PATH_SEPARATORS) {
        return Err(TreeError::InvalidName(name.to_string()));
    }
    Ok(())
}

impl PackTree {
    fn require_folder(&self, index: NodeIndex) -> Result<(), TreeError> {
        if self.node(index)?.is_leaf() {
            return Err(TreeError::NotAFolder(self.path_of(index)));
        }
        Ok(())
    }

    /// Create an empty folder under `parent`.
    ///
    /// `None` uses `New Folder`, suffixed with a counter while a sibling folder
    /// already has that name. An explicit name that is taken is an error.
    pub fn create_folder(
        &mut self,
        parent: NodeIndex,
        name: Option<&str>,
    ) -> Result<NodeIndex, TreeError> {
        self.require_folder(parent)?;
        let name = match name {
            Some(explicit) => {
                validate_segment(explicit)?;
                if self.find_child_folder(parent, explicit).is_some() {
                    return Err(TreeError::NameConflict {
                        name: explicit.to_string(),
                        parent: self.path_of(parent),
                    });
                }
                explicit.to_string()
            }
            None => {
                let mut candidate = DEFAULT_FOLDER_NAME.to_string();
                let mut n = 1;
                while self.find_child_folder(parent, &candidate).is_some() {
                    candidate = format!("{} {}", DEFAULT_FOLDER_NAME, n);
                    n += 1;
                }
                candidate
            }
        };
        self.attach_folder(parent, &name)
    }

    /// Rename a folder. Leaves are named after their asset and cannot be renamed.
    pub fn rename(&mut self, index: NodeIndex, new_name: &str) -> Result<(), TreeError> {
        let node = self.node(index)?;
        let Some(parent) = node.parent else {
            return Err(TreeError::RootOperation("renamed"));
        };
        if node.is_leaf() {
            return Err(TreeError::NotAFolder(self.path_of(index)));
        }
        validate_segment(new_name)?;
        if let Some(existing) = self.find_child_folder(parent, new_name) {
            if existing != index {
                return Err(TreeError::NameConflict {
                    name: new_name.to_string(),
                    parent: self.path_of(parent),
                });
            }
        }
        self.node_mut(index)?.name = new_name.to_string();
        Ok(())
    }

    /// Reparent a node, appending it after the new parent's existing children.
    pub fn move_node(&mut self, index: NodeIndex, new_parent: NodeIndex) -> Result<(), TreeError> {
        let node = self.node(index)?;
        let Some(old_parent) = node.parent else {
            return Err(TreeError::RootOperation("moved"));
        };
        let is_folder = node.is_folder();
        let name = node.name.clone();
        let asset = node.asset.clone();

        self.require_folder(new_parent)?;
        if self.is_ancestor_or_self(index, new_parent) {
            return Err(TreeError::CyclicMove {
                node: self.path_of(index),
            });
        }
        if old_parent == new_parent {
            return Ok(());
        }
        // Siblings never share a folder name or an asset.
        let clash = match &asset {
            Some(asset) => self.find_child_asset(new_parent, asset).is_some(),
            None => is_folder && self.find_child_folder(new_parent, &name).is_some(),
        };
        if clash {
            return Err(TreeError::NameConflict {
                name,
                parent: self.path_of(new_parent),
            });
        }

        self.node_mut(old_parent)?.children.retain(|&c| c != index);
        self.node_mut(new_parent)?.children.push(index);
        self.node_mut(index)?.parent = Some(new_parent);
        Ok(())
    }
}
