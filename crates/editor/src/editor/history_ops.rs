//! Undo/redo functionality

use crate::codec;
use crate::messenger::{self, Severity};
use crate::state::commands::CommandContext;
use crate::state::{Color, SceneState, SelectionState};

use super::{Editor, Timeline};

/// Swap a recorded snapshot into the scene. Restoring clears the selection.
fn restore_recorded(
    scene: &mut SceneState,
    selection: &mut SelectionState,
    highlight: Color,
    json: &str,
) {
    selection.apply(scene, highlight, None);
    match codec::decode(json) {
        Ok(decoded) => {
            codec::restore(scene, decoded);
        }
        Err(e) => tracing::error!("Recorded snapshot could not be decoded: {}", e),
    }
}

impl Editor {
    /// Undo last change
    pub fn undo(&mut self) -> bool {
        if self.ensure_ready().is_err() {
            return false;
        }
        self.cancel_drag();
        let done = match &mut self.timeline {
            Timeline::Commands(history) => match history.rewind() {
                Some(cmd) => {
                    tracing::debug!("Undo {}", cmd.label());
                    cmd.undo(&mut CommandContext {
                        scene: &mut self.scene,
                        selection: &mut self.selection,
                        highlight: self.highlight,
                    });
                    true
                }
                None => false,
            },
            Timeline::Snapshots(history) => match history.step_back() {
                Some(json) => {
                    restore_recorded(&mut self.scene, &mut self.selection, self.highlight, json);
                    true
                }
                None => false,
            },
        };
        if done {
            self.scene.render();
            self.notify("Undo.", Severity::Info, messenger::SHORT);
        }
        done
    }

    /// Redo last undone change
    pub fn redo(&mut self) -> bool {
        if self.ensure_ready().is_err() {
            return false;
        }
        self.cancel_drag();
        let done = match &mut self.timeline {
            Timeline::Commands(history) => match history.advance() {
                Some(cmd) => {
                    tracing::debug!("Redo {}", cmd.label());
                    cmd.execute(&mut CommandContext {
                        scene: &mut self.scene,
                        selection: &mut self.selection,
                        highlight: self.highlight,
                    });
                    true
                }
                None => false,
            },
            Timeline::Snapshots(history) => match history.advance() {
                Some(json) => {
                    restore_recorded(&mut self.scene, &mut self.selection, self.highlight, json);
                    true
                }
                None => false,
            },
        };
        if done {
            self.scene.render();
            self.notify("Redo.", Severity::Info, messenger::SHORT);
        }
        done
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        match &self.timeline {
            Timeline::Commands(history) => history.can_rewind(),
            Timeline::Snapshots(history) => history.can_step_back(),
        }
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        match &self.timeline {
            Timeline::Commands(history) => history.can_advance(),
            Timeline::Snapshots(history) => history.can_advance(),
        }
    }

    pub fn history_len(&self) -> usize {
        match &self.timeline {
            Timeline::Commands(history) => history.len(),
            Timeline::Snapshots(history) => history.len(),
        }
    }

    pub fn history_cursor(&self) -> Option<usize> {
        match &self.timeline {
            Timeline::Commands(history) => history.cursor(),
            Timeline::Snapshots(history) => history.cursor(),
        }
    }

    /// Recorded snapshots (empty in command mode)
    pub fn recorded_snapshots(&self) -> &[String] {
        match &self.timeline {
            Timeline::Commands(_) => &[],
            Timeline::Snapshots(history) => history.entries(),
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::DVec3;

    use crate::harness::TestHarness;
    use crate::messenger::Severity;
    use crate::state::{HistoryMode, ShapeKind, Transform};

    #[test]
    fn test_undo_redo_notify() {
        let mut h = TestHarness::new();
        h.add_shape(ShapeKind::Box);
        h.messenger.drain();
        assert!(h.editor.undo());
        assert!(!h.editor.undo());
        assert!(h.editor.redo());
        assert!(!h.editor.redo());
        let infos: Vec<_> = h
            .messenger
            .notices()
            .into_iter()
            .filter(|n| n.severity == Severity::Info)
            .map(|n| n.message)
            .collect();
        assert_eq!(infos, ["Undo.", "Redo."]);
    }

    #[test]
    fn test_snapshot_undo_restores_scene() {
        let mut h = TestHarness::with_mode(HistoryMode::Snapshots);
        let id = h.add_shape(ShapeKind::Box);
        h.move_to(&id, DVec3::new(2.0, 0.0, 0.0));
        assert_eq!(h.editor.history_len(), 3);

        assert!(h.editor.undo());
        assert_eq!(h.position_of(&id), Some(DVec3::ZERO));
        assert!(h.editor.selected().is_none());
        assert!(h.editor.undo());
        assert_eq!(h.editor.scene().meshes().len(), 0);
        assert!(!h.editor.undo());

        assert!(h.editor.redo());
        assert!(h.editor.redo());
        assert_eq!(h.position_of(&id), Some(DVec3::new(2.0, 0.0, 0.0)));
    }

    #[test]
    fn test_undo_cancels_drag() {
        let mut h = TestHarness::new();
        h.add_shape(ShapeKind::Box);
        h.editor.begin_drag().unwrap();
        h.editor.undo();
        assert!(!h.editor.is_dragging());
    }

    #[test]
    fn test_undo_mid_drag_puts_entity_back() {
        let mut h = TestHarness::new();
        let a = h.add_shape(ShapeKind::Box);
        h.add_shape(ShapeKind::Sphere);
        h.select(&a);
        h.editor.begin_drag().unwrap();
        h.editor.drag_to(Transform::at(DVec3::new(5.0, 0.0, 0.0)));

        assert!(h.editor.undo());
        assert_eq!(h.position_of(&a), Some(DVec3::ZERO));
        assert!(h.editor.undo());
        assert!(h.editor.redo());
        assert_eq!(h.position_of(&a), Some(DVec3::ZERO));
    }
}
