//! Export, import and project persistence

use shared::SceneSnapshot;

use crate::codec::{self, DecodedScene, RestoreReport};
use crate::error::{EditorError, SnapshotError};
use crate::messenger::{self, Severity};
use crate::project::{KeyValueStore, ProjectRecord, ProjectStore};

use super::{Editor, Pending};

impl Editor {
    /// Current scene as a snapshot
    pub fn capture(&self) -> SceneSnapshot {
        codec::capture(&self.scene)
    }

    /// Pretty-printed snapshot for the export dialog
    pub fn export_json(&self) -> String {
        self.capture().to_json_pretty()
    }

    /// Validate pasted JSON and ask before replacing the scene. Invalid
    /// input is reported and leaves the scene and history untouched.
    pub fn request_import(&mut self, text: &str) -> Result<(), EditorError> {
        self.ensure_ready()?;
        if text.trim().is_empty() {
            self.notify("No JSON data pasted.", Severity::Warning, messenger::NORMAL);
            return Err(SnapshotError::Malformed("empty input".to_string()).into());
        }
        let decoded = match codec::decode(text) {
            Ok(decoded) => decoded,
            Err(e) => {
                tracing::error!("Import rejected: {}", e);
                self.notify(
                    "Invalid JSON data. Please check the format.",
                    Severity::Error,
                    messenger::NORMAL,
                );
                return Err(e.into());
            }
        };
        self.ask(
            Pending::Import(Box::new(decoded)),
            "Replace current scene with this JSON data? Unsaved changes will be lost.",
        );
        Ok(())
    }

    /// Replace the scene without asking (scripted loads, project open)
    pub fn load_json(&mut self, text: &str) -> Result<RestoreReport, EditorError> {
        self.ensure_ready()?;
        let decoded = codec::decode(text)?;
        Ok(self.apply_decoded(decoded))
    }

    /// Swap `decoded` in and start a fresh history from it
    pub(super) fn apply_decoded(&mut self, decoded: DecodedScene) -> RestoreReport {
        self.drag = None;
        self.pending = None;
        self.selection
            .apply(&mut self.scene, self.highlight, None);
        let report = codec::restore(&mut self.scene, decoded);
        self.reset_history();
        if let Some(first) = report.warnings.first() {
            let message = format!(
                "Scene loaded with {} warning(s): {}",
                report.warnings.len(),
                first
            );
            self.notify(&message, Severity::Warning, messenger::NORMAL);
        }
        self.scene.render();
        report
    }

    /// Load a stored project. Missing or unreadable scene data is replaced
    /// with the starter scene, which is written back to the store.
    pub fn open_project<S: KeyValueStore>(
        &mut self,
        projects: &mut ProjectStore<S>,
        id: &str,
    ) -> Result<ProjectRecord, EditorError> {
        self.ensure_ready()?;
        let record = projects.load(id)?;
        self.notify(
            &format!("Opening project \"{}\"...", record.project_name),
            Severity::Info,
            messenger::NORMAL,
        );

        let decoded = match record.scene_data.as_deref().map(codec::decode) {
            Some(Ok(decoded)) => decoded,
            stored => {
                if let Some(Err(e)) = stored {
                    tracing::warn!("Project {} has unreadable scene data: {}", id, e);
                }
                let initial = codec::initial_snapshot();
                projects.save_scene(id, &initial.to_json())?;
                codec::decode_snapshot(&initial)
            }
        };
        self.apply_decoded(decoded);
        tracing::info!("Opened project {} ({})", record.project_name, id);
        Ok(projects.load(id)?)
    }

    pub fn save_project<S: KeyValueStore>(
        &mut self,
        projects: &mut ProjectStore<S>,
        id: &str,
    ) -> Result<(), EditorError> {
        self.ensure_ready()?;
        projects.save_scene(id, &self.capture().to_json())?;
        self.notify("Project saved!", Severity::Success, messenger::BRIEF);
        Ok(())
    }
}
