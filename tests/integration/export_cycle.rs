use std::fs;

use packmaker::error::ApiError;
use packmaker::exporter::{build, revert};
use packmaker::host::{AssetHost, FsAssetHost};
use packmaker::import::add_locations;
use packmaker::pack::Pack;
use packmaker::store::{PackStore, TomlPackStore};

use crate::support::create_project;

const DEST: &str = "Assets/_PACK_EXPORT/ui";

fn open_host(root: &std::path::Path) -> FsAssetHost {
    FsAssetHost::open(root, Some(root.join("state/assets.json"))).unwrap()
}

fn ui_pack(host: &mut FsAssetHost) -> Pack {
    let mut pack = Pack::new("ui").unwrap();
    let root = pack.tree.root();
    add_locations(
        &mut pack,
        host,
        &["Assets/Art/icons".to_string(), "Assets/Sfx/click.wav".to_string()],
        root,
    )
    .unwrap();
    pack
}

#[test]
fn build_moves_assets_and_revert_restores_them() {
    let temp = create_project();
    let root = temp.path();
    let mut host = open_host(root);
    let mut pack = ui_pack(&mut host);

    let report = build(&mut pack, &mut host, DEST).unwrap();
    assert_eq!(report.total, 4);
    assert_eq!(report.moved, 4);
    assert!(report.failures.is_empty());

    assert!(root.join(DEST).join("icons/a.png").is_file());
    assert!(root.join(DEST).join("icons/a.png.meta").is_file());
    assert!(root.join(DEST).join("icons/small/c.png").is_file());
    assert!(root.join(DEST).join("click.wav").is_file());
    assert!(!root.join("Assets/Art/icons/a.png").exists());
    assert!(pack.entries.iter().all(|e| e.original_path.is_some()));

    let report = revert(&mut pack, &mut host).unwrap();
    assert_eq!(report.restored, 4);
    assert!(report.failures.is_empty());

    assert!(root.join("Assets/Art/icons/a.png").is_file());
    assert!(root.join("Assets/Art/icons/a.png.meta").is_file());
    assert!(root.join("Assets/Sfx/click.wav").is_file());
    assert!(!root.join(DEST).exists());
    assert!(root.join("Assets/_PACK_EXPORT").is_dir());
    assert!(pack.entries.iter().all(|e| e.original_path.is_none()));
    assert!(!pack.is_built());
}

#[test]
fn built_pack_survives_save_and_reload() {
    let temp = create_project();
    let root = temp.path();
    let store = TomlPackStore::new(root.join("state/packs"));

    {
        let mut host = open_host(root);
        let mut pack = ui_pack(&mut host);
        build(&mut pack, &mut host, DEST).unwrap();
        store.save(&mut pack).unwrap();
        host.flush().unwrap();
    }

    let mut host = open_host(root);
    let mut pack = store.load("ui").unwrap();
    assert!(pack.is_built());
    assert_eq!(pack.built_to.as_deref(), Some(DEST));

    let report = revert(&mut pack, &mut host).unwrap();
    assert_eq!(report.restored, 4);
    assert!(root.join("Assets/Art/icons/small/c.png").is_file());
    assert!(!root.join(DEST).exists());
}

#[test]
fn existing_destination_is_a_conflict() {
    let temp = create_project();
    let root = temp.path();
    fs::create_dir_all(root.join(DEST)).unwrap();
    let mut host = open_host(root);
    let mut pack = ui_pack(&mut host);

    let err = build(&mut pack, &mut host, DEST).unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)));
    assert!(root.join("Assets/Art/icons/a.png").is_file());
    assert!(pack.entries.iter().all(|e| e.original_path.is_none()));
    assert!(pack.built_to.is_none());
}

#[test]
fn missing_source_file_is_reported_and_build_continues() {
    let temp = create_project();
    let root = temp.path();
    let mut host = open_host(root);
    let mut pack = ui_pack(&mut host);
    fs::remove_file(root.join("Assets/Art/icons/b.png")).unwrap();

    let report = build(&mut pack, &mut host, DEST).unwrap();
    assert_eq!(report.moved, 3);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].path, "icons/b.png");

    // Recorded before the move was attempted.
    let failed = pack
        .entries
        .iter()
        .find(|e| e.path == "icons/b.png")
        .unwrap();
    assert_eq!(
        failed.original_path.as_deref(),
        Some("Assets/Art/icons/b.png")
    );
    assert!(root.join(DEST).join("icons/small/c.png").is_file());
}

#[test]
fn index_tracks_moves_across_reopen() {
    let temp = create_project();
    let root = temp.path();
    let asset = {
        let mut host = open_host(root);
        let mut pack = ui_pack(&mut host);
        build(&mut pack, &mut host, DEST).unwrap();
        host.flush().unwrap();
        pack.entries[0].asset.clone()
    };

    let host = open_host(root);
    let location = host.asset_path(&asset).unwrap();
    assert!(location.starts_with(DEST));
    assert!(root.join(&location).is_file());
}
