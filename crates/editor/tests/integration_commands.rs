//! Integration tests for the AgentCommand JSON protocol.
//!
//! Tests the full command pipeline: JSON string -> parse -> execute -> response.

use archviz_editor_lib::command::{execute_json, execute_json_batch};
use archviz_editor_lib::fixtures::sample_snapshot_json;
use archviz_editor_lib::harness::TestHarness;

#[test]
fn test_command_add_box() {
    let mut h = TestHarness::new();

    let json = r#"{"command": "add_box", "width": 2.0, "height": 3.0, "depth": 4.0}"#;

    let resp = execute_json(&mut h, json).unwrap();
    assert!(resp.success);
    let id = resp.data.as_ref().unwrap()["id"].as_str().unwrap().to_string();
    assert_eq!(h.mesh_count(), 1);
    assert_eq!(h.editor.scene().mesh(&id).unwrap().kind, "Box (2x3x4)");
}

#[test]
fn test_command_full_workflow_via_json_batch() {
    let mut h = TestHarness::new();

    let json = r#"[
        {"command": "add_shape", "shape": "box"},
        {"command": "add_shape", "shape": "cylinder"},
        {"command": "add_light", "kind": "point"},
        {"command": "undo"},
        {"command": "redo"},
        {"command": "inspect"}
    ]"#;

    let responses = execute_json_batch(&mut h, json).unwrap();
    assert_eq!(responses.len(), 6);
    for resp in &responses {
        assert!(resp.success, "Failed: {:?}", resp.error);
    }
    let data = responses[5].data.as_ref().unwrap();
    assert_eq!(data["mesh_count"], 2);
    assert_eq!(data["light_count"], 1);
    assert_eq!(data["meshes"][1]["geometry"], "CylinderGeometry");
    assert_eq!(data["history"]["can_redo"], false);
}

#[test]
fn test_command_select_pick_and_clear() {
    let mut h = TestHarness::new();
    let a = h.add_box(1.0, 1.0, 1.0);
    let b = h.add_shape(archviz_editor_lib::state::ShapeKind::Sphere);
    h.move_to(&b, glam::DVec3::new(5.0, 0.0, 0.0));

    let resp = execute_json(&mut h, &format!(r#"{{"command": "select", "id": "{a}"}}"#)).unwrap();
    assert_eq!(resp.data.unwrap()["selected"]["id"], a.as_str());

    let resp = execute_json(&mut h, r#"{"command": "pick", "x": 5.0, "z": 0.2}"#).unwrap();
    assert_eq!(resp.data.unwrap()["selected"]["id"], b.as_str());
    assert!(h.is_selected(&b));

    let resp = execute_json(&mut h, r#"{"command": "pick", "x": 40.0, "z": 40.0}"#).unwrap();
    assert!(resp.data.unwrap()["selected"].is_null());

    execute_json(&mut h, &format!(r#"{{"command": "select", "id": "{a}"}}"#)).unwrap();
    execute_json(&mut h, r#"{"command": "select"}"#).unwrap();
    assert!(h.editor.selected().is_none());
}

#[test]
fn test_command_delete_declined() {
    let mut h = TestHarness::new();
    let id = h.add_box(1.0, 1.0, 1.0);

    let json = format!(
        r#"[{{"command": "delete", "id": "{id}"}}, {{"command": "inspect"}}, {{"command": "confirm", "answer": false}}]"#
    );
    let responses = execute_json_batch(&mut h, &json).unwrap();
    assert_eq!(responses[1].data.as_ref().unwrap()["pending"]["delete"]["id"], id.as_str());
    assert_eq!(responses[2].data.as_ref().unwrap()["applied"], false);
    assert_eq!(h.mesh_count(), 1);
}

#[test]
fn test_command_rename_duplicate_transform() {
    let mut h = TestHarness::new();
    let id = h.add_box(1.0, 1.0, 1.0);

    let json = format!(
        r#"[
            {{"command": "rename", "id": "{id}", "name": "Desk"}},
            {{"command": "transform", "id": "{id}", "rotation": [0, 1.5, 0], "scale": [2, 1, 1]}},
            {{"command": "duplicate"}}
        ]"#
    );
    let responses = execute_json_batch(&mut h, &json).unwrap();
    assert!(responses.iter().all(|r| r.success));
    assert!(h.find_by_name("Desk").is_some());
    assert!(h.find_by_name("Desk_copy").is_some());
    assert_eq!(h.editor.history_len(), 4);
}

#[test]
fn test_command_import_and_export() {
    let mut h = TestHarness::new();
    let import = serde_json::json!({ "command": "import_scene", "json": sample_snapshot_json() });

    let resp = execute_json(&mut h, &import.to_string()).unwrap();
    assert_eq!(resp.data.unwrap()["pending"], true);
    assert_eq!(h.mesh_count(), 0);

    let resp = execute_json(&mut h, r#"{"command": "confirm", "answer": true}"#).unwrap();
    assert_eq!(resp.data.unwrap()["applied"], true);
    assert_eq!(h.mesh_count(), 2);

    let resp = execute_json(&mut h, r#"{"command": "export_scene"}"#).unwrap();
    let data = resp.data.unwrap();
    let scene_json = data["scene_json"].as_str().unwrap();
    assert!(scene_json.contains("\"Wall\""));
}

#[test]
fn test_command_bad_import_reports_error() {
    let mut h = TestHarness::new();
    let resp = execute_json(&mut h, r#"{"command": "import_scene", "json": "{not json"}"#).unwrap();
    assert!(!resp.success);
    assert!(resp.error.unwrap().contains("malformed"));
}

#[test]
fn test_command_unknown_is_rejected() {
    let mut h = TestHarness::new();
    assert!(execute_json(&mut h, r#"{"command": "explode"}"#).is_err());
    assert!(execute_json_batch(&mut h, r#"{"command": "undo"}"#).is_err());
}
