//! Selection & edit coordinator
//!
//! [`Editor`] is the single entry point for every user action. It owns the
//! scene, the selection and the history, and talks to the two collaborators
//! (graphics and messenger). Every mutation is built as an [`EditCommand`]
//! and committed through one path, whichever history mode is active.

mod confirm;
mod drag;
mod edit_ops;
mod history_ops;
mod io_ops;
mod selection_ops;

pub use confirm::PendingAction;
pub use edit_ops::CameraView;

use std::time::Duration;

use crate::codec::{self, color::linear_from_hex, DecodedScene};
use crate::error::EditorError;
use crate::graph::SceneGraph;
use crate::messenger::{self, Messenger, Severity};
use crate::state::commands::CommandContext;
use crate::state::{
    Color, EditCommand, EditorSettings, EntityRef, EnvironmentSettings, EnvironmentState,
    History, HistoryMode, SceneState, SelectionState, Transform,
};

/// Undo timeline for the active history mode
enum Timeline {
    Commands(History<EditCommand>),
    /// Compact snapshot JSON; equal strings mean equal scenes
    Snapshots(History<String>),
}

/// Action waiting for the user's answer
enum Pending {
    Delete(EntityRef),
    Import(Box<DecodedScene>),
}

/// Transform cached when a gizmo drag starts
struct DragStart {
    target: EntityRef,
    transform: Transform,
}

pub struct Editor {
    scene: SceneState,
    selection: SelectionState,
    timeline: Timeline,
    settings: EditorSettings,
    highlight: Color,
    messenger: Box<dyn Messenger>,
    pending: Option<Pending>,
    drag: Option<DragStart>,
    /// Set when the graphics collaborator failed to start
    unavailable: Option<String>,
}

pub(crate) fn environment_from_settings(settings: &EnvironmentSettings) -> EnvironmentState {
    EnvironmentState {
        background: linear_from_hex(settings.background),
        ambient_color: linear_from_hex(settings.ambient_color),
        ambient_intensity: settings.ambient_intensity,
    }
}

impl Editor {
    /// Editor over a working graphics collaborator
    pub fn new(
        graph: Box<dyn SceneGraph>,
        messenger: Box<dyn Messenger>,
        settings: EditorSettings,
    ) -> Self {
        let mut scene = SceneState::new(graph);
        scene.set_camera(codec::camera_from_record(&settings.camera));
        scene.set_environment(environment_from_settings(&settings.environment));

        let timeline = match settings.history_mode {
            HistoryMode::Commands => Timeline::Commands(History::new(settings.max_history)),
            HistoryMode::Snapshots => {
                let mut history = History::new(settings.max_history);
                history.reset(codec::capture(&scene).to_json());
                Timeline::Snapshots(history)
            }
        };
        tracing::info!(
            "Editor ready ({:?} history, {} entries max)",
            settings.history_mode,
            settings.max_history
        );

        Self {
            scene,
            selection: SelectionState::default(),
            timeline,
            highlight: linear_from_hex(settings.highlight_color),
            settings,
            messenger,
            pending: None,
            drag: None,
            unavailable: None,
        }
    }

    /// Read-only editor for a session whose graphics collaborator could not
    /// be created. The failure is reported once; every mutation afterwards
    /// returns [`EditorError::CollaboratorUnavailable`].
    pub fn unavailable(
        reason: impl Into<String>,
        mut messenger: Box<dyn Messenger>,
        settings: EditorSettings,
    ) -> Self {
        let reason = reason.into();
        tracing::error!("Graphics initialization failed: {}", reason);
        messenger.notify(
            &format!("Critical error initializing 3D editor: {reason}"),
            Severity::Error,
            messenger::LONG,
        );
        Self {
            scene: SceneState::default(),
            selection: SelectionState::default(),
            timeline: Timeline::Commands(History::new(settings.max_history)),
            highlight: linear_from_hex(settings.highlight_color),
            settings,
            messenger,
            pending: None,
            drag: None,
            unavailable: Some(reason),
        }
    }

    /// Start from the outcome of creating the graphics collaborator
    pub fn start(
        graph: Result<Box<dyn SceneGraph>, String>,
        messenger: Box<dyn Messenger>,
        settings: EditorSettings,
    ) -> Self {
        match graph {
            Ok(graph) => Self::new(graph, messenger, settings),
            Err(reason) => Self::unavailable(reason, messenger, settings),
        }
    }

    pub fn scene(&self) -> &SceneState {
        &self.scene
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn history_mode(&self) -> HistoryMode {
        match self.timeline {
            Timeline::Commands(_) => HistoryMode::Commands,
            Timeline::Snapshots(_) => HistoryMode::Snapshots,
        }
    }

    pub fn is_available(&self) -> bool {
        self.unavailable.is_none()
    }

    pub fn unavailable_reason(&self) -> Option<&str> {
        self.unavailable.as_deref()
    }

    fn ensure_ready(&self) -> Result<(), EditorError> {
        match &self.unavailable {
            Some(reason) => Err(EditorError::CollaboratorUnavailable(reason.clone())),
            None => Ok(()),
        }
    }

    fn notify(&mut self, message: &str, severity: Severity, duration: Duration) {
        self.messenger.notify(message, severity, duration);
    }

    /// Refuse to touch an entity whose deletion is awaiting confirmation
    fn guard(&mut self, target: &EntityRef) -> Result<(), EditorError> {
        if matches!(&self.pending, Some(Pending::Delete(p)) if p == target) {
            self.notify(
                "Please answer the pending confirmation first.",
                Severity::Warning,
                messenger::NORMAL,
            );
            return Err(EditorError::ConfirmationPending(target.id().clone()));
        }
        Ok(())
    }

    /// Run `cmd` and record it. In snapshot mode the command is only the
    /// means of mutation; the resulting scene is what gets recorded.
    fn commit(&mut self, mut cmd: EditCommand) {
        let Self {
            scene,
            selection,
            timeline,
            highlight,
            ..
        } = self;
        cmd.execute(&mut CommandContext {
            scene: &mut *scene,
            selection: &mut *selection,
            highlight: *highlight,
        });
        tracing::debug!("Committed {}", cmd.label());
        match timeline {
            Timeline::Commands(history) => history.record(cmd),
            Timeline::Snapshots(history) => {
                if !history.record_if_changed(codec::capture(scene).to_json()) {
                    tracing::debug!("Scene unchanged, nothing recorded");
                }
            }
        }
        scene.render();
    }

    /// Drop all history and start over from the current scene
    fn reset_history(&mut self) {
        match &mut self.timeline {
            Timeline::Commands(history) => history.clear(),
            Timeline::Snapshots(history) => history.reset(codec::capture(&self.scene).to_json()),
        }
    }
}
