//! Filesystem asset host.
//!
//! Assets are files below a project root. Each asset gets a stable reference
//! the first time it is loaded; the reference-to-location index is kept in a
//! JSON file so references survive moves and restarts. `<file>.meta`
//! side-files travel with their asset.

use super::{
    is_meta_file, join_location, normalize_location, AssetHost, META_EXTENSION,
};
use crate::error::{ApiError, StorageError};
use crate::types::AssetRef;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Persisted asset index: reference → current location.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetIndex {
    #[serde(default)]
    pub assets: BTreeMap<AssetRef, String>,
}

impl AssetIndex {
    fn find_by_location(&self, location: &str) -> Option<&AssetRef> {
        self.assets
            .iter()
            .find(|(_, l)| l.as_str() == location)
            .map(|(a, _)| a)
    }
}

/// Derive a reference for a location: hex of a blake3 digest, salted until unique.
fn derive_asset_ref(index: &AssetIndex, location: &str) -> AssetRef {
    let mut salt = 0u32;
    loop {
        let mut hasher = blake3::Hasher::new();
        hasher.update(location.as_bytes());
        if salt > 0 {
            hasher.update(&salt.to_le_bytes());
        }
        let digest = hasher.finalize();
        let candidate = AssetRef::new(hex::encode(&digest.as_bytes()[..16]));
        if !index.assets.contains_key(&candidate) {
            return candidate;
        }
        salt += 1;
    }
}

fn meta_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_owned();
    os.push(".");
    os.push(META_EXTENSION);
    PathBuf::from(os)
}

pub struct FsAssetHost {
    project_root: PathBuf,
    index_path: Option<PathBuf>,
    index: AssetIndex,
    dirty: bool,
}

impl FsAssetHost {
    /// Open a host over `project_root`, loading the asset index if present.
    pub fn open(project_root: &Path, index_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let project_root = dunce::canonicalize(project_root).map_err(|e| {
            ApiError::ConfigError(format!(
                "Failed to canonicalize project root {}: {}",
                project_root.display(),
                e
            ))
        })?;

        let index = match &index_path {
            Some(path) if path.exists() => {
                let content = std::fs::read_to_string(path)?;
                serde_json::from_str(&content).map_err(|e| {
                    StorageError::Serialization(format!(
                        "Failed to parse asset index {}: {}",
                        path.display(),
                        e
                    ))
                })?
            }
            _ => AssetIndex::default(),
        };

        tracing::debug!(
            root = %project_root.display(),
            assets = index.assets.len(),
            "Opened filesystem asset host"
        );

        Ok(Self {
            project_root,
            index_path,
            index,
            dirty: false,
        })
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn index(&self) -> &AssetIndex {
        &self.index
    }

    /// Write the asset index if it changed since the last flush.
    pub fn flush(&mut self) -> Result<(), ApiError> {
        let Some(path) = &self.index_path else {
            return Ok(());
        };
        if !self.dirty {
            return Ok(());
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.index)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        std::fs::write(path, content)?;
        self.dirty = false;
        Ok(())
    }

    /// Absolute path of a location; rejects anything escaping the project root.
    fn absolute(&self, location: &str) -> Result<PathBuf, StorageError> {
        let location = normalize_location(location);
        let relative = Path::new(&location);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(StorageError::InvalidPath(format!(
                "Location must stay inside the project: {}",
                location
            )));
        }
        Ok(self.project_root.join(relative))
    }

    fn location_of(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.project_root).ok()?;
        let parts: Vec<String> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        Some(parts.join("/"))
    }

    fn try_move(&mut self, from: &str, to: &str) -> Result<(), String> {
        let source = self.absolute(from).map_err(|e| e.to_string())?;
        let target = self.absolute(to).map_err(|e| e.to_string())?;
        if !source.is_file() {
            return Err(format!("Source asset not found: {}", from));
        }
        if target.exists() {
            return Err(format!("Destination already exists: {}", to));
        }
        match target.parent() {
            Some(parent) if parent.is_dir() => {}
            _ => return Err(format!("Destination folder does not exist for {}", to)),
        }

        std::fs::rename(&source, &target)
            .map_err(|e| format!("Failed to move {} to {}: {}", from, to, e))?;
        let source_meta = meta_path(&source);
        if source_meta.is_file() {
            if let Err(e) = std::fs::rename(&source_meta, meta_path(&target)) {
                tracing::warn!("Failed to move metadata for {}: {}", from, e);
            }
        }

        let from = normalize_location(from);
        let to = normalize_location(to);
        if let Some(asset) = self.index.find_by_location(&from).cloned() {
            self.index.assets.insert(asset, to);
            self.dirty = true;
        }
        Ok(())
    }
}

impl AssetHost for FsAssetHost {
    fn asset_path(&self, asset: &AssetRef) -> Option<String> {
        self.index.assets.get(asset).cloned()
    }

    fn load_asset(&mut self, location: &str) -> Result<AssetRef, ApiError> {
        let location = normalize_location(location);
        let path = self.absolute(&location)?;
        if !path.is_file() {
            return Err(ApiError::StorageError(StorageError::InvalidPath(format!(
                "Not a file: {}",
                location
            ))));
        }
        if let Some(existing) = self.index.find_by_location(&location) {
            return Ok(existing.clone());
        }
        let asset = derive_asset_ref(&self.index, &location);
        tracing::debug!(%asset, %location, "Registered asset");
        self.index.assets.insert(asset.clone(), location);
        self.dirty = true;
        Ok(asset)
    }

    fn folder_exists(&self, location: &str) -> bool {
        self.absolute(location).map(|p| p.is_dir()).unwrap_or(false)
    }

    fn list_files(&self, location: &str, recursive: bool) -> Result<Vec<String>, ApiError> {
        let root = self.absolute(location)?;
        if !root.is_dir() {
            return Err(ApiError::StorageError(StorageError::InvalidPath(format!(
                "Not a folder: {}",
                location
            ))));
        }
        let walker = WalkDir::new(&root)
            .min_depth(1)
            .max_depth(if recursive { usize::MAX } else { 1 })
            .sort_by_file_name();

        let mut files = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!("Failed to read entry under {}: {}", location, e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            if let Some(found) = self.location_of(entry.path()) {
                if !is_meta_file(&found) {
                    files.push(found);
                }
            }
        }
        Ok(files)
    }

    fn create_folder(&mut self, parent: &str, name: &str) -> Result<String, ApiError> {
        let location = join_location(parent, name);
        let path = self.absolute(&location)?;
        if !self.absolute(parent)?.is_dir() {
            return Err(ApiError::StorageError(StorageError::InvalidPath(format!(
                "Parent folder does not exist: {}",
                parent
            ))));
        }
        if !path.is_dir() {
            std::fs::create_dir(&path)?;
            tracing::debug!(%location, "Created folder");
        }
        Ok(location)
    }

    fn move_asset(&mut self, from: &str, to: &str) -> Option<String> {
        self.try_move(from, to).err()
    }

    fn delete_folder(&mut self, location: &str) -> Result<(), ApiError> {
        let folder = normalize_location(location);
        if folder.is_empty() {
            return Err(ApiError::StorageError(StorageError::InvalidPath(
                "Refusing to delete the project root".to_string(),
            )));
        }
        let path = self.absolute(&folder)?;
        if path.is_dir() {
            std::fs::remove_dir_all(&path)?;
        }
        let meta = meta_path(&path);
        if meta.is_file() {
            std::fs::remove_file(&meta)?;
        }

        let prefix = format!("{}/", folder);
        let before = self.index.assets.len();
        self.index.assets.retain(|_, l| !l.starts_with(&prefix));
        let dropped = before - self.index.assets.len();
        if dropped > 0 {
            tracing::warn!(
                folder = %folder,
                dropped,
                "Deleted folder still held indexed assets"
            );
            self.dirty = true;
        }
        Ok(())
    }
}
