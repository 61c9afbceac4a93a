//! Packs
//!
//! A pack is a named virtual tree plus the durable entry list it flattens to,
//! and the bookkeeping of its current build (if any).

use crate::codec::{self, FileEntry, FolderEntry};
use crate::error::{ApiError, TreeError};
use crate::tree::PackTree;
use crate::types::AssetRef;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What the pack store persists for one pack.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackDocument {
    pub name: String,
    /// Destination root of the current build.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub built_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub built_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub entries: Vec<FileEntry>,
    /// Folders with nothing in them yet.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub folders: Vec<FolderEntry>,
}

/// In-memory pack: live tree plus the last flattened entries.
#[derive(Debug, Clone)]
pub struct Pack {
    pub name: String,
    pub tree: PackTree,
    pub entries: Vec<FileEntry>,
    pub built_to: Option<String>,
    pub built_at: Option<DateTime<Utc>>,
}

/// Check a pack name is usable as a single file and folder name.
pub fn validate_pack_name(name: &str) -> Result<(), ApiError> {
    let bad = name.trim().is_empty()
        || name.trim() != name
        || name.starts_with('.')
        || name.contains(crate::types::PATH_SEPARATORS)
        || name.chars().any(char::is_control);
    if bad {
        return Err(ApiError::InvalidPackName(name.to_string()));
    }
    Ok(())
}

impl Pack {
    /// Create an empty pack.
    pub fn new(name: impl Into<String>) -> Result<Self, ApiError> {
        let name = name.into();
        validate_pack_name(&name)?;
        Ok(Self {
            name,
            tree: PackTree::new(),
            entries: Vec::new(),
            built_to: None,
            built_at: None,
        })
    }

    /// Rebuild a pack from its persisted document.
    pub fn from_document(doc: PackDocument) -> Result<Self, TreeError> {
        let mut tree = codec::rebuild(&doc.entries)?;
        codec::restore_folders(&mut tree, &doc.folders)?;
        Ok(Self {
            name: doc.name,
            tree,
            entries: doc.entries,
            built_to: doc.built_to,
            built_at: doc.built_at,
        })
    }

    /// Re-flatten the tree and return the document to persist.
    pub fn to_document(&mut self) -> PackDocument {
        self.sync_entries();
        PackDocument {
            name: self.name.clone(),
            built_to: self.built_to.clone(),
            built_at: self.built_at,
            entries: self.entries.clone(),
            folders: codec::empty_folders(&self.tree),
        }
    }

    /// Regenerate `entries` from the live tree.
    ///
    /// Original paths recorded by a build are carried over to the new entries
    /// of the same asset.
    pub fn sync_entries(&mut self) {
        let originals: HashMap<AssetRef, String> = self
            .entries
            .iter()
            .filter_map(|e| e.original_path.clone().map(|p| (e.asset.clone(), p)))
            .collect();

        let mut entries = codec::flatten(&self.tree);
        for entry in &mut entries {
            entry.original_path = originals.get(&entry.asset).cloned();
        }
        self.entries = entries;
    }

    /// True while any entry still remembers a pre-build location.
    pub fn is_built(&self) -> bool {
        self.built_to.is_some() || self.entries.iter().any(|e| e.original_path.is_some())
    }

    pub fn leaf_count(&self) -> usize {
        self.tree.leaf_count()
    }
}
