use std::sync::Arc;

use serde_json::json;

use tilemux_common::{Event, Rect, TerminalMode};
use tilemux_tiling::{Axis, NodeShape};

use super::*;
use crate::error::StoreError;
use crate::store::{TerminalStore, DEFAULT_PANEL_BOUNDS, FIRST_Z_INDEX, MAX_RECENT_DIRS};
use crate::testing::{harness, harness_with, test_config, FakePtys, FixedConfig, Harness};

fn restored_from(blob: impl Into<String>) -> Harness {
    harness_with(Some(test_config()), Arc::new(MemoryBlobStore::with_blob(blob)))
}

fn leaf(profile: &str, title: &str) -> serde_json::Value {
    json!({
        "kind": "leaf",
        "terminal": { "title": title, "shell_profile_id": profile, "cwd": "/work" }
    })
}

#[tokio::test]
async fn save_and_restore_reproduces_the_arrangement() {
    let mut h = harness();
    let a = h.open().await;
    let b = h
        .store
        .split_terminal(&a, Axis::Vertical, None)
        .await
        .unwrap()
        .unwrap();
    let c = h.store.create_terminal(Some("zsh")).await.unwrap().unwrap();
    let d = h.open().await;

    h.store.rename_terminal(&a, "editor", Some(true));
    h.store.set_tab_color(&a, Some("#3366ff".into()));
    h.store.set_startup_command(&b, "htop");
    let split = h.store.tree().splits()[0].id;
    h.store.set_split_ratio(split, 0.7);
    h.store.move_to_float(&d);
    h.store.toggle_maximize(&d);
    h.store.update_floating_panel(&d, Rect::new(40.0, 50.0, 500.0, 300.0));
    h.store.save_session().await.unwrap();

    let mut r = restored_from(h.blobs.contents().unwrap());
    assert!(r.store.restore_session().await.unwrap());

    assert_eq!(r.store.snapshot(), h.store.snapshot());
    assert_eq!(r.store.len(), 4);
    r.assert_consistent();

    let leaves = r.store.tree().leaf_order();
    let profiles: Vec<_> = leaves
        .iter()
        .map(|id| r.store.session(id).unwrap().shell_profile_id.as_str())
        .collect();
    assert_eq!(profiles, ["bash", "bash", "zsh"]);
    assert!(!leaves.contains(&a) && !leaves.contains(&b) && !leaves.contains(&c));

    let editor = r.store.session(&leaves[0]).unwrap();
    assert_eq!(editor.title, "editor");
    assert!(editor.custom_title);
    assert_eq!(editor.tab_color.as_deref(), Some("#3366ff"));
    assert_eq!(r.store.session(&leaves[2]).unwrap().cwd, "/srv/zsh");

    assert_eq!(r.ptys.written_to(&leaves[1]), "htop\r");
    assert_eq!(r.ptys.written_to(&leaves[0]), "");

    let panel = &r.store.floating_panels()[0];
    assert_eq!(panel.bounds(), Rect::new(40.0, 50.0, 500.0, 300.0));
    assert!(!panel.maximized);
    assert_eq!(panel.z_index, FIRST_Z_INDEX);
    assert_eq!(r.store.mode_of(&panel.terminal_id), Some(TerminalMode::Floating));

    assert_eq!(r.store.focused(), Some(&leaves[0]));
}

#[tokio::test]
async fn dormant_and_detached_sessions_are_not_saved() {
    let mut h = harness();
    let (a, b, _c) = (h.open().await, h.open().await, h.open().await);
    h.store.move_to_dormant(&a);
    h.store.detach_terminal(&b);

    assert_eq!(h.store.snapshot().terminal_count(), 1);
}

#[tokio::test]
async fn unknown_profiles_are_dropped_and_splits_collapse() {
    let blob = json!({
        "tree": {
            "kind": "split",
            "axis": "horizontal",
            "ratio": 0.4,
            "first": leaf("fish", "gone"),
            "second": {
                "kind": "split",
                "axis": "vertical",
                "first": leaf("bash", "kept"),
                "second": leaf("zsh", "also kept")
            }
        }
    });
    let mut r = restored_from(blob.to_string());

    assert!(r.store.restore_session().await.unwrap());

    let leaves = r.store.tree().leaf_order();
    assert_eq!(leaves.len(), 2);
    assert_eq!(
        r.store.tree().to_shape(),
        Some(NodeShape::split_v(
            NodeShape::leaf(leaves[0].clone()),
            NodeShape::leaf(leaves[1].clone())
        ))
    );
    assert_eq!(r.store.session(&leaves[0]).unwrap().title, "kept");
    r.assert_consistent();
}

#[tokio::test]
async fn nothing_restorable_reports_false() {
    let blob = json!({ "tree": leaf("fish", "gone") });
    let mut r = restored_from(blob.to_string());

    assert!(!r.store.restore_session().await.unwrap());
    assert!(r.store.is_empty());
    assert!(r.store.tree().is_empty());
}

#[tokio::test]
async fn broken_shells_are_skipped() {
    let blob = json!({
        "tree": {
            "kind": "split",
            "axis": "horizontal",
            "first": leaf("broken", "never"),
            "second": leaf("bash", "fine")
        }
    });
    let mut r = restored_from(blob.to_string());

    assert!(r.store.restore_session().await.unwrap());
    assert_eq!(r.store.len(), 1);
}

#[tokio::test]
async fn program_paths_and_empty_cwds_fall_back_to_the_default() {
    let blob = json!({
        "tree": {
            "kind": "split",
            "axis": "horizontal",
            "first": {
                "kind": "leaf",
                "terminal": { "shell_profile_id": "bash", "cwd": "C:\\Apps\\tool.exe" }
            },
            "second": {
                "kind": "leaf",
                "terminal": { "shell_profile_id": "zsh", "title": "" }
            }
        }
    });
    let mut r = restored_from(blob.to_string());
    r.store.restore_session().await.unwrap();

    let leaves = r.store.tree().leaf_order();
    let first = r.store.session(&leaves[0]).unwrap();
    assert_eq!(first.cwd, "/home/test");
    assert_eq!(first.title, "Terminal");

    let second = r.store.session(&leaves[1]).unwrap();
    assert_eq!(second.cwd, "/srv/zsh");
    assert_eq!(second.title, "Zsh");
}

#[tokio::test]
async fn floating_panels_restore_with_default_bounds() {
    let blob = json!({
        "floating": [
            { "terminal": { "shell_profile_id": "bash" } },
            { "terminal": { "shell_profile_id": "zsh" }, "x": 5.0, "y": 6.0, "width": 70.0, "height": 80.0 }
        ]
    });
    let mut r = restored_from(blob.to_string());

    assert!(r.store.restore_session().await.unwrap());

    let panels = r.store.floating_panels();
    assert_eq!(panels.len(), 2);
    assert_eq!(panels[0].bounds(), DEFAULT_PANEL_BOUNDS);
    assert_eq!(panels[1].bounds(), Rect::new(5.0, 6.0, 70.0, 80.0));
    assert_eq!(panels[1].z_index, FIRST_Z_INDEX + 1);
    assert!(r.store.tree().is_empty());
    assert_eq!(r.store.focused(), Some(&panels[0].terminal_id));
    r.assert_consistent();
}

#[tokio::test]
async fn restore_replaces_running_sessions() {
    let mut source = harness();
    source.open().await;
    source.store.save_session().await.unwrap();

    let mut r = restored_from(source.blobs.contents().unwrap());
    let old = r.open().await;

    assert!(r.store.restore_session().await.unwrap());

    assert!(r.store.session(&old).is_none());
    assert_eq!(r.ptys.killed(), vec![old]);
    assert_eq!(r.store.len(), 1);
}

#[tokio::test]
async fn restore_without_config_leaves_running_sessions_alone() {
    let mut source = harness();
    source.open().await;
    source.store.save_session().await.unwrap();

    let mut r = restored_from(source.blobs.contents().unwrap());
    let running = r.open().await;
    r.config.set(None);

    assert!(!r.store.restore_session().await.unwrap());

    assert!(r.store.session(&running).is_some());
    assert!(r.ptys.killed().is_empty());
    assert_eq!(r.store.focused(), Some(&running));
    r.assert_consistent();
}

#[tokio::test]
async fn loading_a_layout_without_config_changes_nothing() {
    let mut h = harness();
    let a = h.open().await;
    let b = h.open().await;
    h.store.save_named_layout("pair").await.unwrap();
    h.config.set(None);

    assert!(!h.store.load_named_layout("pair").await.unwrap());

    assert_eq!(h.store.len(), 2);
    assert_eq!(h.store.tree().leaf_order(), vec![a, b]);
    assert!(h.ptys.killed().is_empty());
    h.assert_consistent();
}

#[tokio::test]
async fn restore_without_saved_session_is_false() {
    let mut h = harness();
    assert!(!h.store.restore_session().await.unwrap());
    assert!(h.store.load_saved_state().await.unwrap().is_none());
}

#[tokio::test]
async fn malformed_blob_is_a_format_error() {
    let mut r = restored_from("{ not json");
    let a = r.open().await;

    let result = r.store.restore_session().await;

    assert!(matches!(
        result,
        Err(StoreError::Persistence(tilemux_common::PersistenceError::Format(_)))
    ));
    assert!(r.store.session(&a).is_some());
}

#[tokio::test]
async fn saved_state_filters_directory_lists() {
    let recent: Vec<String> = (0..12).map(|i| format!("/r{i}")).collect();
    let blob = json!({
        "favorite_dirs": ["/src", "D:\\setup.msi"],
        "recent_dirs": recent,
        "tree": leaf("bash", "later")
    });
    let mut r = restored_from(blob.to_string());

    let snapshot = r.store.load_saved_state().await.unwrap().unwrap();

    assert_eq!(snapshot.terminal_count(), 1);
    assert!(r.store.is_empty());
    assert_eq!(r.store.favorite_dirs(), &["/src".to_string()]);
    assert_eq!(r.store.recent_dirs().len(), MAX_RECENT_DIRS);
    assert_eq!(r.store.recent_dirs()[0], "/r0");
}

#[tokio::test]
async fn save_publishes_and_reports_write_failures() {
    let mut h = harness();
    h.open().await;
    let mut events = h.store.subscribe();

    h.store.save_session().await.unwrap();
    assert_eq!(events.recv().await.unwrap(), Event::SessionSaved);

    h.blobs.set_fail_writes(true);
    assert!(matches!(
        h.store.save_session().await,
        Err(StoreError::Persistence(_))
    ));
}

#[tokio::test]
async fn saved_document_carries_directories() {
    let mut h = harness();
    h.store.add_favorite_dir("/src");
    h.store.add_recent_dir("/tmp");
    h.store.save_session().await.unwrap();

    let doc: SessionDocument = serde_json::from_str(&h.blobs.contents().unwrap()).unwrap();
    assert_eq!(doc.version, SESSION_FORMAT_VERSION);
    assert_eq!(doc.favorite_dirs, vec!["/src".to_string()]);
    assert_eq!(doc.recent_dirs, vec!["/tmp".to_string()]);
    assert!(doc.tree.is_none());
}

// =============================================================================
// NAMED LAYOUTS
// =============================================================================

#[tokio::test]
async fn named_layouts_save_list_load_and_delete() {
    let mut h = harness();
    h.open().await;
    h.open().await;
    h.store.save_named_layout("pair").await.unwrap();
    let c = h.open().await;
    h.store.move_to_float(&c);
    h.store.save_named_layout("wide").await.unwrap();

    assert_eq!(
        h.store.layout_names(),
        vec![
            LayoutSummary {
                name: "pair".into(),
                count: 2
            },
            LayoutSummary {
                name: "wide".into(),
                count: 3
            },
        ]
    );

    assert!(h.store.load_named_layout("pair").await.unwrap());
    assert_eq!(h.store.len(), 2);
    assert!(h.store.floating_panels().is_empty());
    assert_eq!(h.ptys.killed().len(), 3);
    h.assert_consistent();

    assert!(!h.store.load_named_layout("missing").await.unwrap());
    assert_eq!(h.store.len(), 2);

    assert!(h.store.delete_named_layout("wide").await.unwrap());
    assert!(!h.store.delete_named_layout("wide").await.unwrap());
    assert_eq!(h.store.layout_names().len(), 1);
}

#[tokio::test]
async fn named_layouts_survive_a_restart() {
    let mut h = harness();
    h.open().await;
    h.store.save_named_layout("solo").await.unwrap();

    let mut r = restored_from(h.blobs.contents().unwrap());
    r.store.load_saved_state().await.unwrap();

    assert_eq!(
        r.store.layout_names(),
        vec![LayoutSummary {
            name: "solo".into(),
            count: 1
        }]
    );
    assert!(r.store.load_named_layout("solo").await.unwrap());
    assert_eq!(r.store.len(), 1);
}

#[tokio::test]
async fn loading_a_layout_keeps_directories_and_other_layouts() {
    let mut h = harness();
    h.open().await;
    h.store.add_favorite_dir("/src");
    h.store.save_named_layout("a").await.unwrap();
    h.store.save_named_layout("b").await.unwrap();

    h.store.load_named_layout("a").await.unwrap();

    assert_eq!(h.store.favorite_dirs(), &["/src".to_string()]);
    assert_eq!(h.store.layout_names().len(), 2);
}

// =============================================================================
// FILE STORE
// =============================================================================

#[tokio::test]
async fn session_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state").join("session.json");

    let ptys = FakePtys::new();
    let mut store = TerminalStore::new(
        FixedConfig::new(Some(test_config())),
        ptys.clone(),
        Arc::new(JsonFileStore::new(&path)),
    );
    store.create_terminal(None).await.unwrap();
    store.create_terminal(Some("zsh")).await.unwrap();
    store.save_session().await.unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let doc: SessionDocument = serde_json::from_str(&text).unwrap();
    assert_eq!(doc.tree.as_ref().map(SnapshotNode::leaf_count), Some(2));

    let mut again = TerminalStore::new(
        FixedConfig::new(Some(test_config())),
        FakePtys::new(),
        Arc::new(JsonFileStore::new(&path)),
    );
    assert!(again.restore_session().await.unwrap());
    assert_eq!(again.snapshot(), store.snapshot());
}
