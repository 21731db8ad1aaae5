//! Actions that need the user's confirmation.
//!
//! One question can be outstanding at a time. Asking a new one replaces the
//! unanswered one, and an answer always applies to the latest question.

use crate::error::EditorError;
use crate::messenger::{self, Severity};
use crate::state::{EditCommand, EntityRef};

use super::{Editor, Pending};

/// What the outstanding question is about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    Delete(EntityRef),
    Import,
}

impl Editor {
    /// Ask before deleting `target`. Nothing changes until
    /// [`Editor::resolve_confirmation`] is called with `true`.
    pub fn perform_delete(&mut self, target: &EntityRef) -> Result<(), EditorError> {
        self.ensure_ready()?;
        let name = self
            .scene
            .name_of(target)
            .ok_or_else(|| EditorError::UnknownEntity(target.id().clone()))?
            .to_string();
        self.ask(
            Pending::Delete(target.clone()),
            &format!("Are you sure you want to delete \"{name}\"?"),
        );
        Ok(())
    }

    pub fn delete_selected(&mut self) -> Result<(), EditorError> {
        self.ensure_ready()?;
        match self.selection.current().cloned() {
            Some(target) => self.perform_delete(&target),
            None => {
                self.notify(
                    "No object selected to delete.",
                    Severity::Warning,
                    messenger::NORMAL,
                );
                Err(EditorError::NothingSelected)
            }
        }
    }

    pub fn pending_confirmation(&self) -> Option<PendingAction> {
        self.pending.as_ref().map(|p| match p {
            Pending::Delete(target) => PendingAction::Delete(target.clone()),
            Pending::Import(_) => PendingAction::Import,
        })
    }

    /// Deliver the user's answer. Returns whether the pending action ran.
    pub fn resolve_confirmation(&mut self, accepted: bool) -> Result<bool, EditorError> {
        self.ensure_ready()?;
        let Some(pending) = self.pending.take() else {
            tracing::debug!("Confirmation answered with nothing pending");
            return Ok(false);
        };
        if !accepted {
            tracing::info!("Confirmation declined");
            return Ok(false);
        }
        match pending {
            Pending::Delete(target) => Ok(self.delete_now(&target)),
            Pending::Import(decoded) => {
                self.apply_decoded(*decoded);
                self.notify("Scene loaded from JSON!", Severity::Success, messenger::NORMAL);
                Ok(true)
            }
        }
    }

    pub(super) fn ask(&mut self, pending: Pending, question: &str) {
        if self.pending.is_some() {
            tracing::debug!("Replacing unanswered confirmation");
        }
        self.pending = Some(pending);
        self.messenger.ask(question);
    }

    fn delete_now(&mut self, target: &EntityRef) -> bool {
        let Some(name) = self.scene.name_of(target).map(str::to_string) else {
            self.notify(
                "The object to delete no longer exists.",
                Severity::Warning,
                messenger::NORMAL,
            );
            return false;
        };
        if self.drag.as_ref().is_some_and(|d| &d.target == target) {
            self.drag = None;
        }
        let cmd = match target {
            EntityRef::Mesh(id) => EditCommand::delete_mesh(id.clone()),
            EntityRef::Light(id) => EditCommand::delete_light(id.clone()),
        };
        self.commit(cmd);
        tracing::info!("Deleted {} ({})", name, target.id());
        self.notify(&format!("Deleted \"{name}\"."), Severity::Success, messenger::BRIEF);
        true
    }
}

#[cfg(test)]
mod tests {
    use glam::DVec3;

    use super::*;
    use crate::harness::TestHarness;
    use crate::state::{ShapeKind, Transform};

    #[test]
    fn test_delete_waits_for_answer() {
        let mut h = TestHarness::new();
        let id = h.add_shape(ShapeKind::Box);
        let target = EntityRef::Mesh(id.clone());
        h.editor.perform_delete(&target).unwrap();
        assert!(h.editor.scene().mesh(&id).is_some());
        assert_eq!(
            h.editor.pending_confirmation(),
            Some(PendingAction::Delete(target.clone()))
        );
        assert_eq!(h.messenger.questions().len(), 1);

        assert!(h.editor.resolve_confirmation(true).unwrap());
        assert!(h.editor.scene().mesh(&id).is_none());
        assert!(h.editor.selected().is_none());
        assert_eq!(h.graph.node_count(), 0);
    }

    #[test]
    fn test_declined_delete_changes_nothing() {
        let mut h = TestHarness::new();
        let id = h.add_shape(ShapeKind::Box);
        h.editor.delete_selected().unwrap();
        assert!(!h.editor.resolve_confirmation(false).unwrap());
        assert!(h.editor.scene().mesh(&id).is_some());
        assert_eq!(h.editor.history_len(), 1);
        assert!(h.editor.pending_confirmation().is_none());
    }

    #[test]
    fn test_pending_target_refuses_edits() {
        let mut h = TestHarness::new();
        let id = h.add_shape(ShapeKind::Box);
        let target = EntityRef::Mesh(id);
        h.editor.perform_delete(&target).unwrap();
        let moved = Transform::at(DVec3::new(1.0, 0.0, 0.0));
        assert!(matches!(
            h.editor.perform_transform_commit(&target, moved),
            Err(EditorError::ConfirmationPending(_))
        ));
        assert!(matches!(
            h.editor.begin_drag(),
            Err(EditorError::ConfirmationPending(_))
        ));
    }

    #[test]
    fn test_new_question_replaces_stale_one() {
        let mut h = TestHarness::new();
        let a = h.add_shape(ShapeKind::Box);
        let b = h.add_shape(ShapeKind::Sphere);
        h.editor.perform_delete(&EntityRef::Mesh(a.clone())).unwrap();
        h.editor.perform_delete(&EntityRef::Mesh(b.clone())).unwrap();
        h.editor.resolve_confirmation(true).unwrap();
        assert!(h.editor.scene().mesh(&a).is_some());
        assert!(h.editor.scene().mesh(&b).is_none());
    }

    #[test]
    fn test_delete_with_nothing_selected() {
        let mut h = TestHarness::new();
        assert!(matches!(
            h.editor.delete_selected(),
            Err(EditorError::NothingSelected)
        ));
        assert_eq!(h.messenger.count(Severity::Warning), 1);
    }

    #[test]
    fn test_entity_gone_before_answer() {
        let mut h = TestHarness::new();
        let id = h.add_shape(ShapeKind::Box);
        h.editor.perform_delete(&EntityRef::Mesh(id)).unwrap();
        h.editor.undo();
        assert!(!h.editor.resolve_confirmation(true).unwrap());
        assert_eq!(h.editor.history_cursor(), None);
    }
}
