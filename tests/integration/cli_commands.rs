use packmaker::error::{ApiError, TreeError};
use packmaker::tooling::cli::{Commands, OutputFormat};

use crate::support::{add, context, create_project, new_pack};

fn show_json(ctx: &mut packmaker::tooling::cli::CliContext, pack: &str) -> serde_json::Value {
    let output = ctx
        .execute(&Commands::Show {
            pack: pack.to_string(),
            format: OutputFormat::Json,
            ids: false,
        })
        .unwrap();
    serde_json::from_str(&output).unwrap()
}

fn child_names(node: &serde_json::Value) -> Vec<String> {
    node.get("children")
        .and_then(|c| c.as_array())
        .map(|children| {
            children
                .iter()
                .map(|c| c["name"].as_str().unwrap().to_string())
                .collect()
        })
        .unwrap_or_default()
}

#[test]
fn add_show_and_list() {
    let temp = create_project();
    let mut ctx = context(temp.path());
    new_pack(&mut ctx, "ui");

    let output = add(&mut ctx, "ui", &["Assets/Art/icons"], None);
    assert_eq!(output, "Added 3 files to ui (3 total)");
    let output = add(&mut ctx, "ui", &["Assets/Art/icons", "Assets/Sfx/click.wav"], Some("audio"));
    assert_eq!(output, "Added 4 files to ui (7 total)");

    let shown = show_json(&mut ctx, "ui");
    assert_eq!(shown["name"], "ui");
    assert_eq!(child_names(&shown["tree"]), vec!["icons", "audio"]);
    assert_eq!(
        child_names(&shown["tree"]["children"][1]),
        vec!["icons", "click.wav"]
    );

    let listed = ctx
        .execute(&Commands::List {
            format: OutputFormat::Json,
        })
        .unwrap();
    let listed: serde_json::Value = serde_json::from_str(&listed).unwrap();
    assert_eq!(listed[0]["name"], "ui");
    assert_eq!(listed[0]["files"], 7);

    let text = ctx
        .execute(&Commands::Show {
            pack: "ui".to_string(),
            format: OutputFormat::Text,
            ids: true,
        })
        .unwrap();
    assert!(text.contains("(7 files)"));
    assert!(text.contains("click.wav"));
    assert!(text.contains('#'));
}

#[test]
fn adding_the_same_files_again_is_a_no_op() {
    let temp = create_project();
    let mut ctx = context(temp.path());
    new_pack(&mut ctx, "ui");
    add(&mut ctx, "ui", &["Assets/Art/icons"], None);

    let output = add(&mut ctx, "ui", &["Assets/Art/icons"], None);
    assert_eq!(output, "Added 0 files to ui (3 total)");
}

#[test]
fn folder_edits_persist() {
    let temp = create_project();
    let mut ctx = context(temp.path());
    new_pack(&mut ctx, "ui");
    add(&mut ctx, "ui", &["Assets/Art/icons", "Assets/Sfx/click.wav"], None);

    ctx.execute(&Commands::Rename {
        pack: "ui".to_string(),
        folder: "icons".to_string(),
        name: "sprites".to_string(),
    })
    .unwrap();
    ctx.execute(&Commands::Mv {
        pack: "ui".to_string(),
        path: "click.wav".to_string(),
        into: Some("sprites/small".to_string()),
    })
    .unwrap();
    ctx.execute(&Commands::Rm {
        pack: "ui".to_string(),
        path: "sprites/b.png".to_string(),
    })
    .unwrap();

    let shown = show_json(&mut ctx, "ui");
    let sprites = &shown["tree"]["children"][0];
    assert_eq!(sprites["name"], "sprites");
    assert_eq!(child_names(sprites), vec!["a.png", "small"]);
    assert_eq!(child_names(&sprites["children"][1]), vec!["c.png", "click.wav"]);
}

#[test]
fn renaming_a_file_is_refused() {
    let temp = create_project();
    let mut ctx = context(temp.path());
    new_pack(&mut ctx, "ui");
    add(&mut ctx, "ui", &["Assets/Sfx/click.wav"], None);

    let err = ctx
        .execute(&Commands::Rename {
            pack: "ui".to_string(),
            folder: "click.wav".to_string(),
            name: "boom.wav".to_string(),
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::TreeError(TreeError::NotAFolder(_))));

    let err = ctx
        .execute(&Commands::Rm {
            pack: "ui".to_string(),
            path: "missing.wav".to_string(),
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::PathNotInPack(_)));
}

#[test]
fn build_locks_the_pack_until_revert() {
    let temp = create_project();
    let root = temp.path();
    let mut ctx = context(root);
    new_pack(&mut ctx, "ui");
    add(&mut ctx, "ui", &["Assets/Art/icons", "Assets/Sfx/click.wav"], None);

    let output = ctx
        .execute(&Commands::Build {
            pack: "ui".to_string(),
            format: OutputFormat::Text,
        })
        .unwrap();
    assert!(output.contains("4/4 files moved"));
    assert!(root.join("Assets/_PACK_EXPORT/ui/icons/a.png").is_file());
    assert!(root.join("Assets/_PACK_EXPORT/ui/click.wav.meta").is_file());

    let err = ctx
        .execute(&Commands::Rm {
            pack: "ui".to_string(),
            path: "click.wav".to_string(),
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::PackBuilt(_)));
    let err = ctx
        .execute(&Commands::Build {
            pack: "ui".to_string(),
            format: OutputFormat::Text,
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::PackBuilt(_)));
    let err = ctx
        .execute(&Commands::Delete {
            pack: "ui".to_string(),
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::PackBuilt(_)));

    // A fresh context sees the same build state.
    let mut ctx = context(root);
    let output = ctx
        .execute(&Commands::Revert {
            pack: "ui".to_string(),
            format: OutputFormat::Json,
        })
        .unwrap();
    let report: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(report["restored"], 4);
    assert_eq!(report["destination"], "Assets/_PACK_EXPORT/ui");
    assert!(root.join("Assets/Art/icons/a.png").is_file());
    assert!(root.join("Assets/Sfx/click.wav.meta").is_file());
    assert!(!root.join("Assets/_PACK_EXPORT/ui").exists());

    let err = ctx
        .execute(&Commands::Revert {
            pack: "ui".to_string(),
            format: OutputFormat::Text,
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::PackNotBuilt(_)));

    ctx.execute(&Commands::Delete {
        pack: "ui".to_string(),
    })
    .unwrap();
    let listed = ctx
        .execute(&Commands::List {
            format: OutputFormat::Text,
        })
        .unwrap();
    assert_eq!(listed, "No packs.");
}

#[test]
fn mkdir_numbers_default_names() {
    let temp = create_project();
    let mut ctx = context(temp.path());
    new_pack(&mut ctx, "ui");
    add(&mut ctx, "ui", &["Assets/Sfx/click.wav"], Some("New Folder"));

    let output = ctx
        .execute(&Commands::Mkdir {
            pack: "ui".to_string(),
            parent: None,
            name: None,
        })
        .unwrap();
    assert_eq!(output, "Created folder New Folder 1");
    let shown = show_json(&mut ctx, "ui");
    assert_eq!(child_names(&shown["tree"]), vec!["New Folder", "New Folder 1"]);

    let err = ctx
        .execute(&Commands::Mkdir {
            pack: "ui".to_string(),
            parent: Some("New Folder/click.wav".to_string()),
            name: None,
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::TreeError(TreeError::NotAFolder(_))));
}

#[test]
fn empty_folder_from_mkdir_can_receive_files() {
    let temp = create_project();
    let mut ctx = context(temp.path());
    new_pack(&mut ctx, "ui");
    add(&mut ctx, "ui", &["Assets/Sfx/click.wav"], None);

    ctx.execute(&Commands::Mkdir {
        pack: "ui".to_string(),
        parent: None,
        name: Some("art".to_string()),
    })
    .unwrap();

    // A fresh context only sees what was saved.
    let mut ctx = context(temp.path());
    let shown = show_json(&mut ctx, "ui");
    assert_eq!(child_names(&shown["tree"]), vec!["click.wav", "art"]);

    let output = ctx
        .execute(&Commands::Mv {
            pack: "ui".to_string(),
            path: "click.wav".to_string(),
            into: Some("art".to_string()),
        })
        .unwrap();
    assert_eq!(output, "Moved click.wav to art/click.wav");
    let shown = show_json(&mut ctx, "ui");
    assert_eq!(child_names(&shown["tree"]), vec!["art"]);
    assert_eq!(child_names(&shown["tree"]["children"][0]), vec!["click.wav"]);
}

#[test]
fn unknown_pack_and_bad_names() {
    let temp = create_project();
    let mut ctx = context(temp.path());

    let err = ctx
        .execute(&Commands::Show {
            pack: "nope".to_string(),
            format: OutputFormat::Text,
            ids: false,
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::PackNotFound(_)));

    let err = ctx
        .execute(&Commands::New {
            pack: "../escape".to_string(),
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidPackName(_)));
}
