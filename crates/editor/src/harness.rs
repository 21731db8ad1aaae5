//! Headless test harness for programmatic scene editing.
//!
//! Wraps an [`Editor`] wired to a [`MemoryGraph`] and a
//! [`RecordingMessenger`], both of which stay inspectable from the outside.

use glam::DVec3;

use crate::editor::Editor;
use crate::graph::MemoryGraph;
use crate::messenger::RecordingMessenger;
use crate::state::{EditorSettings, EntityRef, HistoryMode, LightKind, ShapeKind, Transform};

/// Headless test harness: editor plus its in-memory collaborators
pub struct TestHarness {
    pub editor: Editor,
    pub graph: MemoryGraph,
    pub messenger: RecordingMessenger,
}

impl TestHarness {
    /// Create a new empty harness with default settings.
    pub fn new() -> Self {
        Self::with_settings(EditorSettings::default())
    }

    /// Empty harness using the given history mode
    pub fn with_mode(mode: HistoryMode) -> Self {
        Self::with_settings(EditorSettings {
            history_mode: mode,
            ..EditorSettings::default()
        })
    }

    pub fn with_settings(settings: EditorSettings) -> Self {
        let graph = MemoryGraph::new();
        let messenger = RecordingMessenger::new();
        let editor = Editor::new(Box::new(graph.clone()), Box::new(messenger.clone()), settings);
        Self {
            editor,
            graph,
            messenger,
        }
    }

    // ── Scene manipulation ────────────────────────────────────

    /// Add a default primitive and return its id (empty on failure)
    pub fn add_shape(&mut self, shape: ShapeKind) -> String {
        self.editor.add_shape(shape).unwrap_or_default()
    }

    /// Add a sized box and return its id
    pub fn add_box(&mut self, w: f64, h: f64, d: f64) -> String {
        self.editor
            .add_box_with_dimensions(w, h, d)
            .unwrap_or_default()
    }

    /// Add a light and return its id
    pub fn add_light(&mut self, kind: LightKind) -> String {
        self.editor.add_light(kind).unwrap_or_default()
    }

    /// Select an entity by id (mesh or light)
    pub fn select(&mut self, id: &str) -> bool {
        self.editor.select_by_id(id).is_ok()
    }

    pub fn clear_selection(&mut self) {
        self.editor.clear_selection();
    }

    /// Move an entity the way a gizmo drag does: select, drag, release.
    /// Returns whether a step was recorded.
    pub fn move_to(&mut self, id: &str, position: DVec3) -> bool {
        if !self.select(id) {
            return false;
        }
        self.move_selected(position)
    }

    /// Drag the selected entity to `position`, keeping rotation and scale
    pub fn move_selected(&mut self, position: DVec3) -> bool {
        let Some(target) = self.editor.selected().cloned() else {
            return false;
        };
        let Some(current) = self.editor.scene().transform_of(&target) else {
            return false;
        };
        if !matches!(self.editor.begin_drag(), Ok(true)) {
            return false;
        }
        self.editor.drag_to(Transform {
            position,
            ..current
        });
        self.editor.end_drag().unwrap_or(false)
    }

    /// Ask to delete an entity and confirm right away
    pub fn delete(&mut self, id: &str) -> bool {
        let Some(target) = self.editor.scene().entity_ref(id) else {
            return false;
        };
        if self.editor.perform_delete(&target).is_err() {
            return false;
        }
        self.confirm(true)
    }

    /// Answer the pending confirmation
    pub fn confirm(&mut self, answer: bool) -> bool {
        self.editor.resolve_confirmation(answer).unwrap_or(false)
    }

    /// Undo the last operation
    pub fn undo(&mut self) -> bool {
        self.editor.undo()
    }

    /// Redo the last undone operation
    pub fn redo(&mut self) -> bool {
        self.editor.redo()
    }

    // ── Inspection ────────────────────────────────────────────

    /// Position of a mesh or positioned light
    pub fn position_of(&self, id: &str) -> Option<DVec3> {
        let scene = self.editor.scene();
        if let Some(mesh) = scene.mesh(id) {
            return Some(mesh.transform.position);
        }
        scene.light(id).and_then(|l| l.position)
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.editor.selected().map(|r| r.id().as_str())
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.editor
            .selected()
            .is_some_and(|r| r.id() == id)
    }

    /// Number of meshes in the scene
    pub fn mesh_count(&self) -> usize {
        self.editor.scene().meshes().len()
    }

    /// Number of lights in the scene
    pub fn light_count(&self) -> usize {
        self.editor.scene().lights().len()
    }

    /// Mesh or light with the given name
    pub fn find_by_name(&self, name: &str) -> Option<EntityRef> {
        let scene = self.editor.scene();
        scene
            .meshes()
            .iter()
            .find(|m| m.name == name)
            .map(|m| EntityRef::Mesh(m.id.clone()))
            .or_else(|| {
                scene
                    .lights()
                    .iter()
                    .find(|l| l.name == name)
                    .map(|l| EntityRef::Light(l.id.clone()))
            })
    }

    /// Export the current scene as JSON
    pub fn export_scene_json(&self) -> String {
        self.editor.export_json()
    }

    /// Load a scene from JSON without asking (replaces current)
    pub fn load_scene_json(&mut self, json: &str) -> Result<(), String> {
        self.editor
            .load_json(json)
            .map(|_| ())
            .map_err(|e| e.to_string())
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
