//! Integration tests for the headless harness: selection, light satellites,
//! collaborator failure and project persistence.

use glam::DVec3;

use archviz_editor_lib::editor::Editor;
use archviz_editor_lib::graph::{MemoryGraph, NodeKind};
use archviz_editor_lib::harness::TestHarness;
use archviz_editor_lib::messenger::{RecordingMessenger, Severity};
use archviz_editor_lib::project::{FileStore, ProjectStore};
use archviz_editor_lib::state::{EditorSettings, EntityRef, LightKind, ShapeKind};
use archviz_editor_lib::EditorError;

#[test]
fn test_selection_is_exclusive() {
    let mut h = TestHarness::new();
    let mesh = h.add_shape(ShapeKind::Box);
    let light = h.add_light(LightKind::Point);

    h.select(&mesh);
    assert_eq!(h.editor.selection().mesh(), Some(mesh.as_str()));
    h.select(&light);
    assert_eq!(h.editor.selection().mesh(), None);
    assert_eq!(h.editor.selection().light(), Some(light.as_str()));
    assert!(!h.editor.scene().mesh(&mesh).unwrap().is_highlighted());
    assert!(h.editor.scene().light(&light).unwrap().is_highlighted());
}

#[test]
fn test_repeated_selection_never_compounds_highlight() {
    let mut h = TestHarness::new();
    let mesh = h.add_shape(ShapeKind::Box);
    let authored = h.editor.scene().mesh(&mesh).unwrap().authored_material();
    for _ in 0..5 {
        h.select(&mesh);
        h.select(&mesh);
        h.clear_selection();
    }
    let after = h.editor.scene().mesh(&mesh).unwrap();
    assert!(!after.is_highlighted());
    assert_eq!(after.material, authored);
}

#[test]
fn test_gizmo_follows_selection() {
    let mut h = TestHarness::new();
    let mesh = h.add_shape(ShapeKind::Box);
    let ambient = h.add_light(LightKind::Ambient);
    let mesh_node = h.editor.scene().mesh(&mesh).unwrap().node();
    h.select(&mesh);
    assert_eq!(h.graph.gizmo(), mesh_node);

    // Ambient lights have nothing to grab
    h.select(&ambient);
    assert_eq!(h.graph.gizmo(), None);
    h.clear_selection();
    assert_eq!(h.graph.gizmo(), None);
}

#[test]
fn test_light_satellites_live_and_die_together() {
    let mut h = TestHarness::new();
    let spot = h.add_light(LightKind::Spot);
    let ambient = h.add_light(LightKind::Ambient);

    let kinds: Vec<NodeKind> = h.graph.nodes_for(&spot).into_iter().map(|n| n.kind).collect();
    assert!(kinds.contains(&NodeKind::LightTarget));
    assert!(kinds.contains(&NodeKind::LightHelper(LightKind::Spot)));
    assert_eq!(h.graph.nodes_for(&ambient).len(), 1);

    assert!(h.move_to(&spot, DVec3::new(1.0, 6.0, 1.0)));
    let helper = h
        .graph
        .nodes_for(&spot)
        .into_iter()
        .find(|n| matches!(n.kind, NodeKind::LightHelper(_)))
        .unwrap();
    assert_eq!(helper.position, DVec3::new(1.0, 6.0, 1.0));

    assert!(h.delete(&spot));
    assert!(h.delete(&ambient));
    assert_eq!(h.graph.node_count(), 0);
}

#[test]
fn test_pick_prefers_meshes() {
    let mut h = TestHarness::new();
    let lamp = h.add_light(LightKind::Point);
    let mesh = h.add_box(4.0, 1.0, 4.0);
    h.move_to(&lamp, DVec3::new(1.0, 3.0, 1.0));

    assert_eq!(h.editor.pick(1.0, 1.0), Some(EntityRef::Mesh(mesh)));
    assert_eq!(h.editor.pick(30.0, 30.0), None);
    assert!(h.editor.selected().is_none());
}

#[test]
fn test_unavailable_graphics_is_fatal_but_quiet() {
    let messenger = RecordingMessenger::new();
    let mut editor = Editor::start(
        Err("context lost".to_string()),
        Box::new(messenger.clone()),
        EditorSettings::default(),
    );
    assert!(matches!(
        editor.add_light(LightKind::Point),
        Err(EditorError::CollaboratorUnavailable(_))
    ));
    assert!(editor.load_json("{}").is_err());
    assert!(!editor.redo());
    assert_eq!(messenger.notices().len(), 1);
    assert_eq!(messenger.count(Severity::Error), 1);
}

#[test]
fn test_two_editors_are_independent() {
    let graph = MemoryGraph::new();
    let mut a = TestHarness::new();
    let b = Editor::new(
        Box::new(graph.clone()),
        Box::new(RecordingMessenger::new()),
        EditorSettings::default(),
    );
    a.add_shape(ShapeKind::Box);
    assert_eq!(a.mesh_count(), 1);
    assert!(b.scene().meshes().is_empty());
    assert_eq!(graph.node_count(), 0);
}

#[test]
fn test_project_lifecycle_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let mut projects = ProjectStore::new(FileStore::new(dir.path()));
    let record = projects.create("Penthouse").unwrap();

    let mut h = TestHarness::new();
    h.editor.open_project(&mut projects, &record.id).unwrap();
    assert_eq!(h.mesh_count(), 1);
    assert!(!h.editor.can_undo());

    h.add_light(LightKind::Directional);
    h.editor.save_project(&mut projects, &record.id).unwrap();
    assert_eq!(
        h.messenger.last_notice().map(|n| n.message),
        Some("Project saved!".to_string())
    );

    // Reopen from a fresh store over the same directory
    let mut reopened = ProjectStore::new(FileStore::new(dir.path()));
    let listed = reopened.list().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].project_name, "Penthouse");

    let mut other = TestHarness::new();
    other.editor.open_project(&mut reopened, &record.id).unwrap();
    assert_eq!(other.export_scene_json(), h.export_scene_json());
}

#[test]
fn test_project_with_corrupt_scene_is_reset() {
    let dir = tempfile::tempdir().unwrap();
    let mut projects = ProjectStore::new(FileStore::new(dir.path()));
    let record = projects.create("Garage").unwrap();
    projects.save_scene(&record.id, "{oops").unwrap();

    let mut h = TestHarness::new();
    let opened = h.editor.open_project(&mut projects, &record.id).unwrap();
    assert_eq!(h.mesh_count(), 1);
    assert_eq!(h.editor.scene().meshes()[0].name, "Default Cube");
    assert_ne!(opened.scene_data.as_deref(), Some("{oops"));
}

#[test]
fn test_settings_file_drives_history_mode() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, r#"{"history_mode": "snapshots", "max_history": 3}"#).unwrap();
    let settings = EditorSettings::load_from(&path);

    let mut h = TestHarness::with_settings(settings);
    for _ in 0..5 {
        h.add_shape(ShapeKind::Sphere);
    }
    assert_eq!(h.editor.history_len(), 3);
    assert_eq!(h.editor.recorded_snapshots().len(), 3);
}
