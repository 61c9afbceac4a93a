//! In-memory asset host, for previews and tests.

use super::{is_meta_file, join_location, normalize_location, parent_location, AssetHost};
use crate::error::{ApiError, StorageError};
use crate::types::AssetRef;
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Asset host keeping folders and files in maps. The project root is `""`.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssetHost {
    folders: BTreeSet<String>,
    files: BTreeMap<String, AssetRef>,
    next_asset: u64,
    failing_moves: HashSet<String>,
}

impl MemoryAssetHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file (and its parent folders) and return its asset.
    ///
    /// Fails if the file or one of its folders would share a location with
    /// an existing entry of the other kind.
    pub fn add_file(&mut self, location: &str) -> Result<AssetRef, ApiError> {
        let location = normalize_location(location);
        if let Some(existing) = self.files.get(&location) {
            return Ok(existing.clone());
        }
        if self.folders.contains(&location) {
            return Err(occupied(&location, "a folder"));
        }
        self.ensure_folders(parent_location(&location).to_string())?;
        self.next_asset += 1;
        let asset = AssetRef::new(format!("mem{:06}", self.next_asset));
        self.files.insert(location, asset.clone());
        Ok(asset)
    }

    /// Make every move from this location fail.
    pub fn fail_moves_from(&mut self, location: &str) {
        self.failing_moves.insert(normalize_location(location));
    }

    pub fn contains_file(&self, location: &str) -> bool {
        self.files.contains_key(&normalize_location(location))
    }

    /// All files with their assets, by location.
    pub fn files(&self) -> impl Iterator<Item = (&str, &AssetRef)> {
        self.files.iter().map(|(l, a)| (l.as_str(), a))
    }

    fn ensure_folders(&mut self, location: String) -> Result<(), ApiError> {
        let mut current = String::new();
        for segment in location.split('/').filter(|s| !s.is_empty()) {
            current = join_location(&current, segment);
            if self.files.contains_key(&current) {
                return Err(occupied(&current, "a file"));
            }
            self.folders.insert(current.clone());
        }
        Ok(())
    }

    fn is_under(location: &str, folder: &str) -> bool {
        folder.is_empty()
            || location
                .strip_prefix(folder)
                .map(|rest| rest.starts_with('/'))
                .unwrap_or(false)
    }
}

fn occupied(location: &str, by: &str) -> ApiError {
    ApiError::StorageError(StorageError::InvalidPath(format!(
        "Location {} is already taken by {}",
        location, by
    )))
}

impl AssetHost for MemoryAssetHost {
    fn asset_path(&self, asset: &AssetRef) -> Option<String> {
        self.files
            .iter()
            .find(|(_, a)| *a == asset)
            .map(|(l, _)| l.clone())
    }

    fn load_asset(&mut self, location: &str) -> Result<AssetRef, ApiError> {
        self.files
            .get(&normalize_location(location))
            .cloned()
            .ok_or_else(|| {
                ApiError::StorageError(StorageError::InvalidPath(format!(
                    "No asset at {}",
                    location
                )))
            })
    }

    fn folder_exists(&self, location: &str) -> bool {
        let location = normalize_location(location);
        location.is_empty() || self.folders.contains(&location)
    }

    fn list_files(&self, location: &str, recursive: bool) -> Result<Vec<String>, ApiError> {
        let folder = normalize_location(location);
        if !self.folder_exists(&folder) {
            return Err(ApiError::StorageError(StorageError::InvalidPath(format!(
                "Not a folder: {}",
                location
            ))));
        }
        Ok(self
            .files
            .keys()
            .filter(|l| Self::is_under(l, &folder))
            .filter(|l| recursive || parent_location(l) == folder)
            .filter(|l| !is_meta_file(l))
            .cloned()
            .collect())
    }

    fn create_folder(&mut self, parent: &str, name: &str) -> Result<String, ApiError> {
        if !self.folder_exists(parent) {
            return Err(ApiError::StorageError(StorageError::InvalidPath(format!(
                "Parent folder does not exist: {}",
                parent
            ))));
        }
        let location = join_location(parent, name);
        if self.files.contains_key(&location) {
            return Err(occupied(&location, "a file"));
        }
        self.folders.insert(location.clone());
        Ok(location)
    }

    fn move_asset(&mut self, from: &str, to: &str) -> Option<String> {
        let from = normalize_location(from);
        let to = normalize_location(to);
        if self.failing_moves.contains(&from) {
            return Some(format!("Move of {} was refused", from));
        }
        if self.files.contains_key(&to) || self.folders.contains(&to) {
            return Some(format!("Destination already exists: {}", to));
        }
        if !self.folder_exists(parent_location(&to)) {
            return Some(format!("Destination folder does not exist: {}", parent_location(&to)));
        }
        match self.files.remove(&from) {
            Some(asset) => {
                self.files.insert(to, asset);
                None
            }
            None => Some(format!("Source asset not found: {}", from)),
        }
    }

    fn delete_folder(&mut self, location: &str) -> Result<(), ApiError> {
        let folder = normalize_location(location);
        if folder.is_empty() {
            return Err(ApiError::StorageError(StorageError::InvalidPath(
                "Refusing to delete the project root".to_string(),
            )));
        }
        self.folders
            .retain(|f| f != &folder && !Self::is_under(f, &folder));
        self.files.retain(|l, _| !Self::is_under(l, &folder));
        Ok(())
    }
}
