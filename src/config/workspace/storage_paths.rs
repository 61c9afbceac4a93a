//! StorageConfig and resolve_paths for pack storage.

use crate::config::xdg;
use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_PACKS_PATH: &str = ".packmaker/packs";
const DEFAULT_INDEX_PATH: &str = ".packmaker/assets.json";

fn default_packs_path() -> PathBuf {
    PathBuf::from(DEFAULT_PACKS_PATH)
}

fn default_index_path() -> PathBuf {
    PathBuf::from(DEFAULT_INDEX_PATH)
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory of pack documents (relative to workspace root)
    #[serde(default = "default_packs_path")]
    pub packs_path: PathBuf,

    /// Asset index file (relative to workspace root)
    #[serde(default = "default_index_path")]
    pub index_path: PathBuf,
}

/// Storage locations on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedStorage {
    pub packs_dir: PathBuf,
    pub index_file: PathBuf,
}

impl StorageConfig {
    /// Resolve storage paths to actual filesystem locations.
    ///
    /// Default values live in the XDG data directory for the workspace; anything
    /// else is taken relative to the workspace root (absolute paths pass through).
    pub fn resolve_paths(&self, workspace_root: &Path) -> Result<ResolvedStorage, ApiError> {
        let packs_dir = if self.packs_path == default_packs_path() {
            xdg::workspace_data_dir(workspace_root)?.join("packs")
        } else {
            workspace_root.join(&self.packs_path)
        };

        let index_file = if self.index_path == default_index_path() {
            xdg::workspace_data_dir(workspace_root)?.join("assets.json")
        } else {
            workspace_root.join(&self.index_path)
        };

        Ok(ResolvedStorage {
            packs_dir,
            index_file,
        })
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            packs_path: default_packs_path(),
            index_path: default_index_path(),
        }
    }
}
