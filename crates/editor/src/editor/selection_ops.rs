//! Selection and picking

use crate::error::EditorError;
use crate::state::EntityRef;

use super::Editor;

impl Editor {
    /// Select `target` (or nothing). The previous selection loses its
    /// highlight and the gizmo moves to the new one.
    pub fn select(&mut self, target: Option<EntityRef>) {
        if self.ensure_ready().is_err() {
            return;
        }
        self.selection
            .apply(&mut self.scene, self.highlight, target);
        self.scene.render();
    }

    /// Select whichever mesh or light has `id`
    pub fn select_by_id(&mut self, id: &str) -> Result<EntityRef, EditorError> {
        self.ensure_ready()?;
        let target = self
            .scene
            .entity_ref(id)
            .ok_or_else(|| EditorError::UnknownEntity(id.to_string()))?;
        self.select(Some(target.clone()));
        Ok(target)
    }

    pub fn clear_selection(&mut self) {
        self.select(None);
    }

    pub fn selected(&self) -> Option<&EntityRef> {
        self.selection.current()
    }

    /// Viewport click. Meshes are tried before light helpers; a miss clears
    /// the selection. Clicks that end a gizmo drag are ignored.
    pub fn pick(&mut self, x: f64, y: f64) -> Option<EntityRef> {
        if self.ensure_ready().is_err() {
            return None;
        }
        if self.drag.is_some() {
            tracing::debug!("Ignoring click during drag");
            return self.selection.current().cloned();
        }
        let hit = self
            .scene
            .graph()
            .raycast(x, y)
            .and_then(|node| self.scene.entity_for_node(node));
        self.select(hit.clone());
        hit
    }
}
