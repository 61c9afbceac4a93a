//! Asset host
//!
//! The collaborator that owns real asset locations. Packs never touch storage
//! directly: the importer asks the host which asset lives at a location, and
//! the exporter asks it to create folders and move assets.
//!
//! Locations are slash-separated strings relative to the host's project root.

pub mod fs;
pub mod memory;

pub use fs::FsAssetHost;
pub use memory::MemoryAssetHost;

use crate::error::ApiError;
use crate::types::AssetRef;

/// Extension of the metadata side-file that accompanies assets and folders.
pub const META_EXTENSION: &str = "meta";

/// Asset database operations required by packs.
pub trait AssetHost {
    /// Current location of an asset, if known.
    fn asset_path(&self, asset: &AssetRef) -> Option<String>;

    /// Asset stored at a file location, registering it on first sight.
    fn load_asset(&mut self, location: &str) -> Result<AssetRef, ApiError>;

    /// True if the location is an existing folder.
    fn folder_exists(&self, location: &str) -> bool;

    /// Files under a folder, metadata side-files excluded, in a stable order.
    fn list_files(&self, location: &str, recursive: bool) -> Result<Vec<String>, ApiError>;

    /// Create `parent/name` unless it already exists; returns its location.
    fn create_folder(&mut self, parent: &str, name: &str) -> Result<String, ApiError>;

    /// Move an asset. Returns a description of the failure, or `None` on success.
    fn move_asset(&mut self, from: &str, to: &str) -> Option<String>;

    /// Delete a folder recursively together with its metadata side-file.
    fn delete_folder(&mut self, location: &str) -> Result<(), ApiError>;
}

/// Normalize a location: forward slashes, no leading `./`, no trailing slash.
pub fn normalize_location(location: &str) -> String {
    let replaced = location.replace('\\', "/");
    let trimmed = replaced.trim_start_matches("./").trim_end_matches('/');
    trimmed.to_string()
}

/// Join a folder location and a relative path.
pub fn join_location(base: &str, rest: &str) -> String {
    let base = normalize_location(base);
    let rest = normalize_location(rest);
    let rest = rest.trim_start_matches('/');
    if base.is_empty() {
        rest.to_string()
    } else if rest.is_empty() {
        base
    } else {
        format!("{}/{}", base, rest)
    }
}

/// Folder part of a location; empty for top-level locations.
pub fn parent_location(location: &str) -> &str {
    match location.rfind('/') {
        Some(i) => &location[..i],
        None => "",
    }
}

/// True for metadata side-files such as `a.png.meta`.
pub fn is_meta_file(location: &str) -> bool {
    location
        .rsplit('/')
        .next()
        .and_then(|name| name.rsplit_once('.'))
        .map(|(stem, ext)| !stem.is_empty() && ext == META_EXTENSION)
        .unwrap_or(false)
}
