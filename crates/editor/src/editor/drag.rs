//! Gizmo drags
//!
//! A drag moves the entity live without touching history. Releasing it
//! records a single transform step from the cached start transform, and
//! nothing at all if the entity ended where it started.

use crate::error::EditorError;
use crate::state::Transform;

use super::{DragStart, Editor};

impl Editor {
    /// Start dragging the selected entity. Returns `false` when nothing
    /// transformable is selected.
    pub fn begin_drag(&mut self) -> Result<bool, EditorError> {
        self.ensure_ready()?;
        let Some(target) = self.selection.current().cloned() else {
            return Ok(false);
        };
        self.guard(&target)?;
        let Some(transform) = self.scene.transform_of(&target) else {
            return Ok(false);
        };
        tracing::debug!("Drag started on {}", target.id());
        self.drag = Some(DragStart { target, transform });
        Ok(true)
    }

    /// Live update while dragging (not recorded). Non-finite frames are
    /// dropped.
    pub fn drag_to(&mut self, transform: Transform) -> bool {
        let Some(drag) = &self.drag else {
            return false;
        };
        if !transform.is_finite() {
            tracing::warn!("Dropped non-finite drag frame on {}", drag.target.id());
            return false;
        }
        let target = drag.target.clone();
        let moved = self.scene.set_transform(&target, transform);
        self.scene.render();
        moved
    }

    /// Release the gizmo. Returns whether a history step was recorded.
    pub fn end_drag(&mut self) -> Result<bool, EditorError> {
        let Some(DragStart { target, transform }) = self.drag.take() else {
            return Ok(false);
        };
        let Some(current) = self.scene.transform_of(&target) else {
            return Ok(false);
        };
        // Put the start back so the commit performs the whole move itself
        self.scene.set_transform(&target, transform);
        let recorded = self.perform_transform_commit(&target, current)?;
        if !recorded {
            tracing::debug!("Drag on {} ended where it started", target.id());
        }
        Ok(recorded)
    }

    /// Abandon the drag and put the entity back where it started
    pub(super) fn cancel_drag(&mut self) {
        if let Some(DragStart { target, transform }) = self.drag.take() {
            tracing::debug!("Drag on {} cancelled", target.id());
            self.scene.set_transform(&target, transform);
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }
}
