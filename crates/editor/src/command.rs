//! JSON command protocol for scripted sessions.
//!
//! Each command maps onto one editor action. Destructive actions (delete,
//! import) only pose their question; a following `confirm` answers it.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::editor::PendingAction;
use crate::harness::TestHarness;
use crate::state::{EntityRef, LightKind, ShapeKind, Transform};

/// A command a script can execute.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum AgentCommand {
    /// Add a default primitive
    AddShape {
        shape: ShapeKind,
    },
    /// Add a box of the given size resting on the ground
    AddBox {
        width: f64,
        height: f64,
        depth: f64,
    },
    AddLight {
        kind: LightKind,
    },
    /// Select by id, or clear with a missing id
    Select {
        #[serde(default)]
        id: Option<String>,
    },
    ClearSelection,
    /// Viewport click in world XZ coordinates
    Pick {
        x: f64,
        z: f64,
    },
    /// Set any of position / rotation / scale (one history step)
    Transform {
        id: String,
        #[serde(default)]
        position: Option<[f64; 3]>,
        #[serde(default)]
        rotation: Option<[f64; 3]>,
        #[serde(default)]
        scale: Option<[f64; 3]>,
    },
    Rename {
        id: String,
        name: String,
    },
    /// Copy the selected entity
    Duplicate,
    /// Ask to delete an entity; answer with `confirm`
    Delete {
        id: String,
    },
    /// Answer the pending question
    Confirm {
        answer: bool,
    },
    /// Undo the last operation.
    Undo,
    /// Redo the last undone operation.
    Redo,
    /// Inspect the scene: list entities, selection and history.
    Inspect,
    /// Export the scene as JSON.
    ExportScene,
    /// Validate snapshot JSON and ask to replace the scene
    ImportScene {
        json: String,
    },
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }
}

fn created(result: Result<String, crate::error::EditorError>) -> CommandResponse {
    match result {
        Ok(id) => CommandResponse::ok_with_data(serde_json::json!({ "id": id })),
        Err(e) => CommandResponse::err(e.to_string()),
    }
}

fn entity_json(target: &EntityRef) -> serde_json::Value {
    match target {
        EntityRef::Mesh(id) => serde_json::json!({ "kind": "mesh", "id": id }),
        EntityRef::Light(id) => serde_json::json!({ "kind": "light", "id": id }),
    }
}

fn inspect(harness: &TestHarness) -> serde_json::Value {
    let editor = &harness.editor;
    let scene = editor.scene();
    let meshes: Vec<serde_json::Value> = scene
        .meshes()
        .iter()
        .map(|m| {
            serde_json::json!({
                "id": m.id,
                "name": m.name,
                "type": m.kind,
                "geometry": m.geometry.family(),
                "position": m.transform.position.to_array(),
            })
        })
        .collect();
    let lights: Vec<serde_json::Value> = scene
        .lights()
        .iter()
        .map(|l| {
            serde_json::json!({
                "id": l.id,
                "name": l.name,
                "type": l.kind.as_str(),
                "position": l.position.map(|p| p.to_array()),
            })
        })
        .collect();
    let pending = editor.pending_confirmation().map(|p| match p {
        PendingAction::Delete(target) => serde_json::json!({ "delete": entity_json(&target) }),
        PendingAction::Import => serde_json::json!("import"),
    });
    serde_json::json!({
        "mesh_count": meshes.len(),
        "light_count": lights.len(),
        "meshes": meshes,
        "lights": lights,
        "selected": editor.selected().map(entity_json),
        "pending": pending,
        "history": {
            "len": editor.history_len(),
            "cursor": editor.history_cursor(),
            "can_undo": editor.can_undo(),
            "can_redo": editor.can_redo(),
        },
    })
}

/// Execute a single command on the harness.
pub fn execute_command(harness: &mut TestHarness, cmd: AgentCommand) -> CommandResponse {
    match cmd {
        AgentCommand::AddShape { shape } => created(harness.editor.add_shape(shape)),

        AgentCommand::AddBox {
            width,
            height,
            depth,
        } => created(harness.editor.add_box_with_dimensions(width, height, depth)),

        AgentCommand::AddLight { kind } => created(harness.editor.add_light(kind)),

        AgentCommand::Select { id: Some(id) } => match harness.editor.select_by_id(&id) {
            Ok(target) => {
                CommandResponse::ok_with_data(serde_json::json!({ "selected": entity_json(&target) }))
            }
            Err(e) => CommandResponse::err(e.to_string()),
        },

        AgentCommand::Select { id: None } | AgentCommand::ClearSelection => {
            harness.clear_selection();
            CommandResponse::ok()
        }

        AgentCommand::Pick { x, z } => {
            let hit = harness.editor.pick(x, z);
            CommandResponse::ok_with_data(
                serde_json::json!({ "selected": hit.as_ref().map(entity_json) }),
            )
        }

        AgentCommand::Transform {
            id,
            position,
            rotation,
            scale,
        } => {
            let Some(target) = harness.editor.scene().entity_ref(&id) else {
                return CommandResponse::err(format!("Unknown entity: {id}"));
            };
            let Some(current) = harness.editor.scene().transform_of(&target) else {
                return CommandResponse::err(format!("Entity {id} cannot be transformed"));
            };
            let transform = Transform {
                position: position.map_or(current.position, DVec3::from_array),
                rotation: rotation.map_or(current.rotation, DVec3::from_array),
                scale: scale.map_or(current.scale, DVec3::from_array),
            };
            match harness.editor.perform_transform_commit(&target, transform) {
                Ok(recorded) => {
                    CommandResponse::ok_with_data(serde_json::json!({ "recorded": recorded }))
                }
                Err(e) => CommandResponse::err(e.to_string()),
            }
        }

        AgentCommand::Rename { id, name } => {
            let Some(target) = harness.editor.scene().entity_ref(&id) else {
                return CommandResponse::err(format!("Unknown entity: {id}"));
            };
            match harness.editor.rename(&target, &name) {
                Ok(recorded) => {
                    CommandResponse::ok_with_data(serde_json::json!({ "recorded": recorded }))
                }
                Err(e) => CommandResponse::err(e.to_string()),
            }
        }

        AgentCommand::Duplicate => created(harness.editor.duplicate_selected()),

        AgentCommand::Delete { id } => {
            let Some(target) = harness.editor.scene().entity_ref(&id) else {
                return CommandResponse::err(format!("Unknown entity: {id}"));
            };
            match harness.editor.perform_delete(&target) {
                Ok(()) => CommandResponse::ok_with_data(serde_json::json!({ "pending": true })),
                Err(e) => CommandResponse::err(e.to_string()),
            }
        }

        AgentCommand::Confirm { answer } => match harness.editor.resolve_confirmation(answer) {
            Ok(applied) => CommandResponse::ok_with_data(serde_json::json!({ "applied": applied })),
            Err(e) => CommandResponse::err(e.to_string()),
        },

        AgentCommand::Undo => {
            let success = harness.undo();
            CommandResponse::ok_with_data(serde_json::json!({ "undone": success }))
        }

        AgentCommand::Redo => {
            let success = harness.redo();
            CommandResponse::ok_with_data(serde_json::json!({ "redone": success }))
        }

        AgentCommand::Inspect => CommandResponse::ok_with_data(inspect(harness)),

        AgentCommand::ExportScene => {
            let json = harness.export_scene_json();
            CommandResponse::ok_with_data(serde_json::json!({ "scene_json": json }))
        }

        AgentCommand::ImportScene { json } => match harness.editor.request_import(&json) {
            Ok(()) => CommandResponse::ok_with_data(serde_json::json!({ "pending": true })),
            Err(e) => CommandResponse::err(e.to_string()),
        },
    }
}

/// Parse and execute a single JSON command string.
pub fn execute_json(harness: &mut TestHarness, json: &str) -> Result<CommandResponse, String> {
    let cmd: AgentCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(harness, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch(
    harness: &mut TestHarness,
    json: &str,
) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<AgentCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    Ok(cmds
        .into_iter()
        .map(|cmd| execute_command(harness, cmd))
        .collect())
}
