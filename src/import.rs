//! Adding host assets to a pack.

use crate::error::ApiError;
use crate::host::{normalize_location, parent_location, AssetHost};
use crate::pack::Pack;
use crate::types::NodeIndex;
use tracing::{debug, info};

/// Add files or whole folders from the host under `start`.
///
/// A folder contributes every file below it. Each file keeps its path relative
/// to the parent of the location it was picked from, so adding `Assets/Art/icons`
/// yields `icons/...` entries. Returns how many leaves were newly inserted.
pub fn add_locations<H: AssetHost + ?Sized>(
    pack: &mut Pack,
    host: &mut H,
    locations: &[String],
    start: NodeIndex,
) -> Result<usize, ApiError> {
    let mut added = 0;
    for location in locations {
        let location = normalize_location(location);
        let parent = parent_location(&location).to_string();
        let files = if host.folder_exists(&location) {
            host.list_files(&location, true)?
        } else {
            vec![location.clone()]
        };

        for file in files {
            let short_path = file
                .strip_prefix(&parent)
                .unwrap_or(file.as_str())
                .to_string();
            let asset = host.load_asset(&file)?;
            let before = pack.tree.leaf_count();
            let leaf = pack.tree.insert_path(&short_path, asset, start, None)?;
            if pack.tree.leaf_count() > before {
                added += 1;
                debug!(pack = %pack.name, file = %file, node = %pack.tree.path_of(leaf), "Added asset");
            }
        }
    }
    info!(pack = %pack.name, added, "Added assets to pack");
    Ok(added)
}
