//! Integration tests for undo/redo through the editor, in both history modes.

use glam::DVec3;

use archviz_editor_lib::harness::TestHarness;
use archviz_editor_lib::state::history::MAX_HISTORY;
use archviz_editor_lib::state::{EntityRef, HistoryMode, LightKind, ShapeKind, Transform};
use archviz_editor_lib::EditorError;

fn both_modes() -> [HistoryMode; 2] {
    [HistoryMode::Commands, HistoryMode::Snapshots]
}

#[test]
fn test_box_add_move_delete_scenario() {
    let mut h = TestHarness::new();
    let id = h.add_shape(ShapeKind::Box);
    assert_eq!(h.editor.scene().mesh(&id).unwrap().name, "Box_1");
    assert_eq!(h.position_of(&id), Some(DVec3::ZERO));

    assert!(h.move_to(&id, DVec3::new(2.0, 0.0, 0.0)));
    assert!(h.delete(&id));
    assert_eq!(h.mesh_count(), 0);
    assert_eq!(h.editor.history_len(), 3);
    let end_state = h.export_scene_json();

    assert!(h.undo());
    assert_eq!(h.position_of(&id), Some(DVec3::new(2.0, 0.0, 0.0)));
    assert!(h.is_selected(&id));

    assert!(h.undo());
    assert_eq!(h.position_of(&id), Some(DVec3::ZERO));

    assert!(h.undo());
    assert_eq!(h.mesh_count(), 0);
    assert!(h.editor.selected().is_none());
    assert!(!h.undo());

    assert!(h.redo());
    assert!(h.redo());
    assert!(h.redo());
    assert!(!h.redo());
    assert_eq!(h.export_scene_json(), end_state);
    assert_eq!(h.graph.node_count(), 0);
}

#[test]
fn test_box_scenario_in_snapshot_mode() {
    let mut h = TestHarness::with_mode(HistoryMode::Snapshots);
    assert_eq!(h.editor.history_cursor(), Some(0));
    let id = h.add_shape(ShapeKind::Box);
    assert_eq!(h.editor.history_cursor(), Some(1));
    h.move_to(&id, DVec3::new(2.0, 0.0, 0.0));
    assert_eq!(h.editor.history_cursor(), Some(2));
    h.delete(&id);
    assert_eq!(h.editor.history_cursor(), Some(3));
    let end_state = h.export_scene_json();

    h.undo();
    assert_eq!(h.position_of(&id), Some(DVec3::new(2.0, 0.0, 0.0)));
    h.undo();
    assert_eq!(h.position_of(&id), Some(DVec3::ZERO));
    h.undo();
    assert_eq!(h.mesh_count(), 0);
    assert!(!h.undo());

    for _ in 0..3 {
        assert!(h.redo());
    }
    assert_eq!(h.export_scene_json(), end_state);
}

#[test]
fn test_inverse_law() {
    for mode in both_modes() {
        let mut h = TestHarness::with_mode(mode);
        let before = h.export_scene_json();

        let a = h.add_shape(ShapeKind::Box);
        let b = h.add_shape(ShapeKind::Sphere);
        let lamp = h.add_light(LightKind::Spot);
        h.move_to(&a, DVec3::new(1.0, 0.0, -1.0));
        h.move_to(&lamp, DVec3::new(0.0, 4.0, 0.0));
        h.delete(&b);
        h.add_shape(ShapeKind::Cylinder);
        let n = 7;
        let after = h.export_scene_json();

        for _ in 0..n {
            assert!(h.undo(), "{mode:?}");
        }
        assert_eq!(h.export_scene_json(), before, "{mode:?}");
        assert_eq!(h.graph.node_count(), 0, "{mode:?}");

        for _ in 0..n {
            assert!(h.redo(), "{mode:?}");
        }
        assert_eq!(h.export_scene_json(), after, "{mode:?}");
    }
}

#[test]
fn test_history_bound() {
    let mut h = TestHarness::new();
    let id = h.add_shape(ShapeKind::Box);
    for x in 1..(MAX_HISTORY + 5) {
        h.move_to(&id, DVec3::new(x as f64, 0.0, 0.0));
    }
    assert_eq!(h.editor.history_len(), MAX_HISTORY);

    let mut undone = 0;
    while h.undo() {
        undone += 1;
    }
    assert_eq!(undone, MAX_HISTORY);
    // The add and the first four moves fell off the bottom
    assert_eq!(h.position_of(&id), Some(DVec3::new(4.0, 0.0, 0.0)));
}

#[test]
fn test_history_bound_snapshot_mode() {
    let mut h = TestHarness::with_mode(HistoryMode::Snapshots);
    let id = h.add_shape(ShapeKind::Box);
    for x in 1..(MAX_HISTORY + 5) {
        h.move_to(&id, DVec3::new(x as f64, 0.0, 0.0));
    }
    assert_eq!(h.editor.history_len(), MAX_HISTORY);
    assert_eq!(h.editor.history_cursor(), Some(MAX_HISTORY - 1));
    while h.undo() {}
    assert_eq!(h.editor.history_cursor(), Some(0));
    assert_eq!(h.mesh_count(), 1);
}

#[test]
fn test_branch_truncation() {
    let mut h = TestHarness::with_mode(HistoryMode::Snapshots);
    let id = h.add_shape(ShapeKind::Box);
    h.move_to(&id, DVec3::new(1.0, 0.0, 0.0));
    h.move_to(&id, DVec3::new(2.0, 0.0, 0.0));
    assert_eq!(h.editor.history_len(), 4);
    assert_eq!(h.editor.history_cursor(), Some(3));
    let s1 = h.editor.recorded_snapshots()[1].clone();

    h.undo();
    h.undo();
    assert_eq!(h.editor.history_cursor(), Some(1));
    h.move_to(&id, DVec3::new(0.0, 0.0, 5.0));

    assert_eq!(h.editor.history_len(), 3);
    assert_eq!(h.editor.history_cursor(), Some(2));
    assert_eq!(h.editor.recorded_snapshots()[1], s1);
    assert!(!h.editor.can_redo());
}

#[test]
fn test_branch_truncation_command_mode() {
    let mut h = TestHarness::new();
    let id = h.add_shape(ShapeKind::Box);
    h.move_to(&id, DVec3::new(1.0, 0.0, 0.0));
    h.move_to(&id, DVec3::new(2.0, 0.0, 0.0));
    h.undo();
    h.undo();
    h.move_to(&id, DVec3::new(0.0, 0.0, 5.0));
    assert_eq!(h.editor.history_len(), 2);
    assert!(!h.redo());
    assert!(h.undo());
    assert_eq!(h.position_of(&id), Some(DVec3::ZERO));
}

#[test]
fn test_no_op_edits_are_not_recorded() {
    for mode in both_modes() {
        let mut h = TestHarness::with_mode(mode);
        let id = h.add_shape(ShapeKind::Box);
        let len = h.editor.history_len();

        assert!(!h.move_to(&id, DVec3::ZERO));
        let target = EntityRef::Mesh(id.clone());
        assert!(!h.editor.rename(&target, "Box_1").unwrap());
        let material = h.editor.scene().mesh(&id).unwrap().authored_material();
        assert!(!h.editor.set_material(&id, material).unwrap());
        h.select(&id);
        h.clear_selection();

        assert_eq!(h.editor.history_len(), len, "{mode:?}");
    }
}

#[test]
fn test_light_delete_restores_satellites() {
    let mut h = TestHarness::new();
    let id = h.add_light(LightKind::Directional);
    let attached = h.graph.nodes_for(&id).len();
    assert_eq!(attached, 3);

    h.delete(&id);
    assert!(h.graph.nodes_for(&id).is_empty());
    h.undo();
    assert_eq!(h.graph.nodes_for(&id).len(), attached);
    assert!(h.editor.scene().light(&id).unwrap().satellites().is_attached());
}

#[test]
fn test_non_finite_move_never_reaches_history() {
    for mode in both_modes() {
        let mut h = TestHarness::with_mode(mode);
        let id = h.add_shape(ShapeKind::Box);
        let target = EntityRef::Mesh(id.clone());
        let nan = Transform::at(DVec3::new(f64::NAN, 0.0, 0.0));
        assert!(matches!(
            h.editor.perform_transform_commit(&target, nan),
            Err(EditorError::InvalidNumber(_))
        ));
        h.add_shape(ShapeKind::Sphere);

        assert!(h.undo());
        assert_eq!(h.mesh_count(), 1);
        assert_eq!(h.position_of(&id), Some(DVec3::ZERO));
        assert!(h.redo());
        assert_eq!(h.mesh_count(), 2);
    }
}

#[test]
fn test_undo_during_drag_discards_live_move() {
    for mode in both_modes() {
        let mut h = TestHarness::with_mode(mode);
        let a = h.add_shape(ShapeKind::Box);
        h.add_shape(ShapeKind::Box);
        h.select(&a);
        assert!(h.editor.begin_drag().unwrap());
        h.editor.drag_to(Transform::at(DVec3::new(5.0, 0.0, 0.0)));

        assert!(h.undo());
        assert!(!h.editor.is_dragging());
        assert_eq!(h.position_of(&a), Some(DVec3::ZERO));
        assert!(h.undo());
        assert!(h.redo());
        assert_eq!(h.position_of(&a), Some(DVec3::ZERO));
        assert!(h.redo());
        assert_eq!(h.mesh_count(), 2);
    }
}
