use packmaker::codec::{flatten, rebuild};
use packmaker::tree::PackTree;
use packmaker::types::AssetRef;
use proptest::prelude::*;

fn arb_inserts() -> impl Strategy<Value = Vec<(String, AssetRef)>> {
    let path = prop::collection::vec("[a-c]", 1..4).prop_map(|segments| segments.join("/"));
    let asset = (0u8..8).prop_map(|n| AssetRef::new(format!("asset{}", n)));
    prop::collection::vec((path, asset), 0..24)
}

fn build_tree(inserts: &[(String, AssetRef)]) -> PackTree {
    let mut tree = PackTree::new();
    let root = tree.root();
    for (path, asset) in inserts {
        tree.insert_path(path, asset.clone(), root, None).unwrap();
    }
    tree
}

proptest! {
    #[test]
    fn flatten_then_rebuild_reproduces_tree(inserts in arb_inserts()) {
        let tree = build_tree(&inserts);
        let entries = flatten(&tree);
        let rebuilt = rebuild(&entries).unwrap();

        prop_assert_eq!(rebuilt.view(), tree.view());
        prop_assert_eq!(flatten(&rebuilt), entries);
    }

    #[test]
    fn inserting_twice_changes_nothing(inserts in arb_inserts()) {
        let once = build_tree(&inserts);

        let mut twice = build_tree(&inserts);
        let root = twice.root();
        for (path, asset) in &inserts {
            twice.insert_path(path, asset.clone(), root, None).unwrap();
        }

        prop_assert_eq!(twice.view(), once.view());
        prop_assert_eq!(twice.leaf_count(), once.leaf_count());
    }

    #[test]
    fn entries_match_leaves(inserts in arb_inserts()) {
        let tree = build_tree(&inserts);
        let entries = flatten(&tree);

        prop_assert_eq!(entries.len(), tree.leaf_count());
        for entry in &entries {
            let joined: Vec<&str> = entry.path_part.iter().map(|p| p.name.as_str()).collect();
            prop_assert_eq!(joined.join("/"), entry.path.clone());
            prop_assert!(entry.original_path.is_none());
        }
    }

    #[test]
    fn deleting_a_subtree_drops_exactly_its_leaves(inserts in arb_inserts()) {
        let mut tree = build_tree(&inserts);
        let root = tree.root();
        let Some(&first) = tree.children(root).first() else {
            return Ok(());
        };
        let removed = tree.view_of(first).leaf_count();
        let before = tree.leaf_count();

        tree.delete_entry(first).unwrap();

        prop_assert_eq!(tree.leaf_count(), before - removed);
        prop_assert!(!tree.children(root).contains(&first));
    }

    #[test]
    fn deleting_the_root_empties_the_tree(inserts in arb_inserts()) {
        let mut tree = build_tree(&inserts);
        let root = tree.root();

        tree.delete_entry(root).unwrap();

        prop_assert_eq!(tree.root(), root);
        prop_assert!(tree.children(root).is_empty());
        prop_assert!(flatten(&tree).is_empty());
    }
}

#[test]
fn mixed_separators_address_the_same_folders() {
    let mut tree = PackTree::new();
    let root = tree.root();
    tree.insert_path("ui\\icons/a.png", AssetRef::new("A"), root, None)
        .unwrap();
    tree.insert_path("ui/icons\\b.png", AssetRef::new("B"), root, None)
        .unwrap();
    tree.insert_path("//ui//icons//c.png", AssetRef::new("C"), root, None)
        .unwrap();

    let entries = flatten(&tree);
    let paths: Vec<&str> = entries.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, vec!["ui/icons/a.png", "ui/icons/b.png", "ui/icons/c.png"]);
    assert_eq!(tree.children(root).len(), 1);
}

#[test]
fn rebuilt_tree_keeps_issuing_fresh_ids() {
    let mut tree = PackTree::new();
    let root = tree.root();
    tree.insert_path("a/b.png", AssetRef::new("B"), root, None)
        .unwrap();
    let mut rebuilt = rebuild(&flatten(&tree)).unwrap();

    let root = rebuilt.root();
    let leaf = rebuilt
        .insert_path("a/c.png", AssetRef::new("C"), root, None)
        .unwrap();
    let new_id = rebuilt.node(leaf).unwrap().id;
    let existing: Vec<_> = flatten(&tree)
        .into_iter()
        .flat_map(|e| e.path_part.into_iter().map(|p| p.id))
        .collect();
    assert!(!existing.contains(&new_id));
}
