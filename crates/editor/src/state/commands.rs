//! Reversible edit commands.
//!
//! An entity taken out of the scene by a command is parked inside that
//! command until it is put back, so `execute` and `undo` can be repeated any
//! number of times across undo/redo cycles.

use super::model::{
    CameraState, Color, EntityId, EntityRef, EnvironmentState, LightObject, LightParams, Material,
    MeshObject, Transform,
};
use super::scene::SceneState;
use super::selection::SelectionState;

/// What a command needs to touch while running
pub struct CommandContext<'a> {
    pub scene: &'a mut SceneState,
    pub selection: &'a mut SelectionState,
    /// Selection highlight tint
    pub highlight: Color,
}

impl CommandContext<'_> {
    fn select(&mut self, target: Option<EntityRef>) {
        self.selection.apply(self.scene, self.highlight, target);
    }
}

#[derive(Debug, Clone)]
pub enum EditCommand {
    AddMesh {
        id: EntityId,
        index: Option<usize>,
        parked: Option<MeshObject>,
    },
    DeleteMesh {
        id: EntityId,
        index: Option<usize>,
        parked: Option<MeshObject>,
    },
    AddLight {
        id: EntityId,
        index: Option<usize>,
        parked: Option<LightObject>,
    },
    DeleteLight {
        id: EntityId,
        index: Option<usize>,
        parked: Option<LightObject>,
    },
    UpdateTransform {
        target: EntityRef,
        old: Transform,
        new: Transform,
    },
    Rename {
        target: EntityRef,
        old: String,
        new: String,
    },
    UpdateMaterial {
        id: EntityId,
        old: Material,
        new: Material,
    },
    UpdateLight {
        id: EntityId,
        old: LightParams,
        new: LightParams,
    },
    UpdateCamera {
        old: CameraState,
        new: CameraState,
    },
    UpdateEnvironment {
        old: EnvironmentState,
        new: EnvironmentState,
    },
}

impl EditCommand {
    pub fn add_mesh(mesh: MeshObject) -> Self {
        EditCommand::AddMesh {
            id: mesh.id.clone(),
            index: None,
            parked: Some(mesh),
        }
    }

    pub fn delete_mesh(id: impl Into<EntityId>) -> Self {
        EditCommand::DeleteMesh {
            id: id.into(),
            index: None,
            parked: None,
        }
    }

    pub fn add_light(light: LightObject) -> Self {
        EditCommand::AddLight {
            id: light.id.clone(),
            index: None,
            parked: Some(light),
        }
    }

    pub fn delete_light(id: impl Into<EntityId>) -> Self {
        EditCommand::DeleteLight {
            id: id.into(),
            index: None,
            parked: None,
        }
    }

    /// Transform change, or `None` when nothing actually moved
    pub fn update_transform(target: EntityRef, old: Transform, new: Transform) -> Option<Self> {
        (old != new).then_some(EditCommand::UpdateTransform { target, old, new })
    }

    pub fn rename(target: EntityRef, old: String, new: String) -> Option<Self> {
        (old != new).then_some(EditCommand::Rename { target, old, new })
    }

    pub fn update_material(id: EntityId, old: Material, new: Material) -> Option<Self> {
        (old != new).then_some(EditCommand::UpdateMaterial { id, old, new })
    }

    pub fn update_light(id: EntityId, old: LightParams, new: LightParams) -> Option<Self> {
        (old != new).then_some(EditCommand::UpdateLight { id, old, new })
    }

    pub fn update_camera(old: CameraState, new: CameraState) -> Option<Self> {
        (old != new).then_some(EditCommand::UpdateCamera { old, new })
    }

    pub fn update_environment(old: EnvironmentState, new: EnvironmentState) -> Option<Self> {
        (old != new).then_some(EditCommand::UpdateEnvironment { old, new })
    }

    /// Human-readable label for logs and toasts
    pub fn label(&self) -> &'static str {
        match self {
            EditCommand::AddMesh { .. } => "Add Object",
            EditCommand::DeleteMesh { .. } => "Delete Object",
            EditCommand::AddLight { .. } => "Add Light",
            EditCommand::DeleteLight { .. } => "Delete Light",
            EditCommand::UpdateTransform { .. } => "Transform",
            EditCommand::Rename { .. } => "Rename",
            EditCommand::UpdateMaterial { .. } => "Edit Material",
            EditCommand::UpdateLight { .. } => "Edit Light",
            EditCommand::UpdateCamera { .. } => "Camera",
            EditCommand::UpdateEnvironment { .. } => "Environment",
        }
    }

    /// Apply (or re-apply) the command
    pub fn execute(&mut self, ctx: &mut CommandContext<'_>) {
        match self {
            EditCommand::AddMesh { id, index, parked } => {
                if let Some(mesh) = parked.take() {
                    ctx.scene.insert_mesh(*index, mesh);
                    ctx.select(Some(EntityRef::Mesh(id.clone())));
                }
            }
            EditCommand::DeleteMesh { id, index, parked } => {
                if parked.is_none() {
                    ctx.select(None);
                    if let Some((at, mesh)) = ctx.scene.remove_mesh(id) {
                        *index = Some(at);
                        *parked = Some(mesh);
                    }
                }
            }
            EditCommand::AddLight { id, index, parked } => {
                if let Some(light) = parked.take() {
                    ctx.scene.insert_light(*index, light);
                    ctx.select(Some(EntityRef::Light(id.clone())));
                }
            }
            EditCommand::DeleteLight { id, index, parked } => {
                if parked.is_none() {
                    ctx.select(None);
                    if let Some((at, light)) = ctx.scene.remove_light(id) {
                        *index = Some(at);
                        *parked = Some(light);
                    }
                }
            }
            EditCommand::UpdateTransform { target, new, .. } => {
                ctx.scene.set_transform(target, *new);
            }
            EditCommand::Rename { target, new, .. } => {
                ctx.scene.set_name(target, new);
            }
            EditCommand::UpdateMaterial { id, new, .. } => {
                ctx.scene.set_mesh_material(id, *new);
            }
            EditCommand::UpdateLight { id, new, .. } => {
                ctx.scene.set_light_params(id, *new);
            }
            EditCommand::UpdateCamera { new, .. } => ctx.scene.set_camera(*new),
            EditCommand::UpdateEnvironment { new, .. } => ctx.scene.set_environment(*new),
        }
    }

    /// Revert the command
    pub fn undo(&mut self, ctx: &mut CommandContext<'_>) {
        match self {
            EditCommand::AddMesh { id, index, parked } => {
                if parked.is_none() {
                    ctx.select(None);
                    if let Some((at, mesh)) = ctx.scene.remove_mesh(id) {
                        *index = Some(at);
                        *parked = Some(mesh);
                    }
                }
            }
            EditCommand::DeleteMesh { id, index, parked } => {
                if let Some(mesh) = parked.take() {
                    ctx.scene.insert_mesh(*index, mesh);
                    ctx.select(Some(EntityRef::Mesh(id.clone())));
                }
            }
            EditCommand::AddLight { id, index, parked } => {
                if parked.is_none() {
                    ctx.select(None);
                    if let Some((at, light)) = ctx.scene.remove_light(id) {
                        *index = Some(at);
                        *parked = Some(light);
                    }
                }
            }
            EditCommand::DeleteLight { id, index, parked } => {
                if let Some(light) = parked.take() {
                    ctx.scene.insert_light(*index, light);
                    ctx.select(Some(EntityRef::Light(id.clone())));
                }
            }
            EditCommand::UpdateTransform { target, old, .. } => {
                ctx.scene.set_transform(target, *old);
            }
            EditCommand::Rename { target, old, .. } => {
                ctx.scene.set_name(target, old);
            }
            EditCommand::UpdateMaterial { id, old, .. } => {
                ctx.scene.set_mesh_material(id, *old);
            }
            EditCommand::UpdateLight { id, old, .. } => {
                ctx.scene.set_light_params(id, *old);
            }
            EditCommand::UpdateCamera { old, .. } => ctx.scene.set_camera(*old),
            EditCommand::UpdateEnvironment { old, .. } => ctx.scene.set_environment(*old),
        }
    }
}
