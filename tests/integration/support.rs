use std::fs;
use std::path::{Path, PathBuf};

use packmaker::tooling::cli::{CliContext, Commands};
use tempfile::TempDir;

/// Config that keeps pack state inside the temporary workspace.
pub const TEST_CONFIG: &str = r#"
[system.storage]
packs_path = "state/packs"
index_path = "state/assets.json"

[logging]
enabled = false
"#;

/// A small project:
///
/// ```text
/// Assets/Art/icons/a.png (+ .meta)
/// Assets/Art/icons/b.png
/// Assets/Art/icons/small/c.png
/// Assets/Sfx/click.wav (+ .meta)
/// ```
pub fn create_project() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    write(root, "Assets/Art/icons/a.png", "a");
    write(root, "Assets/Art/icons/a.png.meta", "guid: a");
    write(root, "Assets/Art/icons/b.png", "b");
    write(root, "Assets/Art/icons/small/c.png", "c");
    write(root, "Assets/Sfx/click.wav", "click");
    write(root, "Assets/Sfx/click.wav.meta", "guid: click");
    write(root, "test-config.toml", TEST_CONFIG);
    temp
}

pub fn write(root: &Path, location: &str, content: &str) {
    let path = root.join(location);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join("test-config.toml")
}

pub fn context(root: &Path) -> CliContext {
    CliContext::new(root.to_path_buf(), Some(config_path(root))).unwrap()
}

pub fn new_pack(ctx: &mut CliContext, name: &str) {
    ctx.execute(&Commands::New {
        pack: name.to_string(),
    })
    .unwrap();
}

pub fn add(ctx: &mut CliContext, pack: &str, locations: &[&str], into: Option<&str>) -> String {
    ctx.execute(&Commands::Add {
        pack: pack.to_string(),
        locations: locations.iter().map(|l| l.to_string()).collect(),
        into: into.map(str::to_string),
    })
    .unwrap()
}
