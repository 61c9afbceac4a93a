//! Pack exporter
//!
//! Build moves every asset of a pack into a destination folder tree mirroring
//! the pack hierarchy, remembering where each asset came from. Revert moves
//! them back and removes the destination.

use crate::error::ApiError;
use crate::host::{join_location, parent_location, AssetHost};
use crate::pack::Pack;
use crate::types::PathPart;
use chrono::Utc;
use serde::Serialize;
use tracing::{error, info, warn};

/// One asset that could not be handled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    pub path: String,
    pub message: String,
}

/// Outcome of a build.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildReport {
    pub destination: String,
    pub total: usize,
    pub moved: usize,
    pub failures: Vec<FileFailure>,
}

/// Outcome of a revert.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RevertReport {
    pub destination: Option<String>,
    pub total: usize,
    pub restored: usize,
    pub failures: Vec<FileFailure>,
}

/// Create `location` and any missing ancestors through the host.
fn ensure_folder<H: AssetHost + ?Sized>(host: &mut H, location: &str) -> Result<(), ApiError> {
    if location.is_empty() || host.folder_exists(location) {
        return Ok(());
    }
    let parent = parent_location(location);
    ensure_folder(host, parent)?;
    let name = location.rsplit('/').next().unwrap_or(location);
    host.create_folder(parent, name)?;
    Ok(())
}

/// Create one folder per path part below `destination`, reusing existing ones.
fn create_entry_folders<H: AssetHost + ?Sized>(
    host: &mut H,
    destination: &str,
    parts: &[PathPart],
) -> Result<(), ApiError> {
    let mut folder = destination.to_string();
    for part in parts {
        let next = join_location(&folder, &part.name);
        if !host.folder_exists(&next) {
            host.create_folder(&folder, &part.name)?;
        }
        folder = next;
    }
    Ok(())
}

/// Move the pack's assets into `destination`.
///
/// Fails with `Conflict` before touching anything if `destination` exists.
/// Per-file failures are logged and reported; the remaining files are still
/// processed. Each entry's `original_path` is recorded before its move is
/// attempted, so a failed move still leaves it set. `built_to` is recorded as
/// soon as the destination exists.
pub fn build<H: AssetHost + ?Sized>(
    pack: &mut Pack,
    host: &mut H,
    destination: &str,
) -> Result<BuildReport, ApiError> {
    pack.sync_entries();

    if host.folder_exists(destination) {
        error!(
            pack = %pack.name,
            destination,
            "Destination already exists, revert before exporting again"
        );
        return Err(ApiError::Conflict(destination.to_string()));
    }

    ensure_folder(host, destination)?;
    // From here on the destination exists, so the pack must be revertible
    // even if files fail below.
    pack.built_to = Some(destination.to_string());
    pack.built_at = Some(Utc::now());

    let total = pack.entries.len();
    let mut report = BuildReport {
        destination: destination.to_string(),
        total,
        ..Default::default()
    };
    info!(pack = %pack.name, destination, total, "Building pack");

    for (i, entry) in pack.entries.iter_mut().enumerate() {
        info!(
            pack = %pack.name,
            file = i + 1,
            total,
            path = %entry.path,
            "Exporting file"
        );

        let Some(current) = host.asset_path(&entry.asset) else {
            let message = format!("Asset {} is unknown to the host", entry.asset);
            error!(path = %entry.path, "{}", message);
            report.failures.push(FileFailure {
                path: entry.path.clone(),
                message,
            });
            continue;
        };

        let folder_parts = entry.path_part.len().saturating_sub(1);
        if let Err(e) = create_entry_folders(host, destination, &entry.path_part[..folder_parts]) {
            let message = format!("Failed to create folders for {}: {}", entry.path, e);
            error!(path = %entry.path, "{}", message);
            report.failures.push(FileFailure {
                path: entry.path.clone(),
                message,
            });
            continue;
        }

        entry.original_path = Some(current.clone());
        let target = join_location(destination, &entry.path);
        match host.move_asset(&current, &target) {
            None => report.moved += 1,
            Some(message) => {
                error!(path = %entry.path, from = %current, to = %target, "{}", message);
                report.failures.push(FileFailure {
                    path: entry.path.clone(),
                    message,
                });
            }
        }
    }

    info!(
        pack = %pack.name,
        moved = report.moved,
        failed = report.failures.len(),
        "Pack built"
    );
    Ok(report)
}

/// Move every relocated asset back and delete the build destination.
///
/// `original_path` is cleared for every entry that had one, whether or not
/// its move succeeded.
pub fn revert<H: AssetHost + ?Sized>(
    pack: &mut Pack,
    host: &mut H,
) -> Result<RevertReport, ApiError> {
    let mut report = RevertReport {
        destination: pack.built_to.clone(),
        ..Default::default()
    };

    for entry in pack.entries.iter_mut() {
        let Some(original) = entry.original_path.take() else {
            continue;
        };
        report.total += 1;

        let outcome = match host.asset_path(&entry.asset) {
            Some(current) if current == original => None,
            Some(current) => host.move_asset(&current, &original),
            None => Some(format!("Asset {} is unknown to the host", entry.asset)),
        };
        match outcome {
            None => report.restored += 1,
            Some(message) => {
                error!(path = %entry.path, to = %original, "{}", message);
                report.failures.push(FileFailure {
                    path: entry.path.clone(),
                    message,
                });
            }
        }
    }

    match pack.built_to.take() {
        Some(destination) => host.delete_folder(&destination)?,
        None => warn!(pack = %pack.name, "Pack has no recorded destination to delete"),
    }
    pack.built_at = None;

    info!(
        pack = %pack.name,
        restored = report.restored,
        failed = report.failures.len(),
        "Pack reverted"
    );
    Ok(report)
}
