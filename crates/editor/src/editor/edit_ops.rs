//! Creation and property edits

use std::f64::consts::FRAC_PI_2;

use glam::DVec3;

use crate::codec;
use crate::error::EditorError;
use crate::messenger::{self, Severity};
use crate::state::{
    entity_display_name, new_entity_id, CameraState, EditCommand, EntityId, EntityRef,
    EnvironmentState, Geometry, LightKind, LightObject, LightParams, Material, MeshObject,
    SceneEntity, ShapeKind, Transform,
};

use super::Editor;

/// Smallest accepted box dimension
const MIN_DIMENSION: f64 = 0.01;

/// Widest spot cone, radians
const MAX_SPOT_ANGLE: f64 = FRAC_PI_2;

/// Preset camera directions. Moving the camera this way is navigation and
/// is not recorded in history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraView {
    Top,
    Front,
    Side,
    Iso,
}

impl Editor {
    /// Add a fully-formed entity as one undoable step and select it. An id
    /// that is already in use is replaced with a fresh one.
    pub fn perform_add(&mut self, mut entity: SceneEntity) -> Result<EntityId, EditorError> {
        self.ensure_ready()?;
        let slot = match &mut entity {
            SceneEntity::Mesh(mesh) => &mut mesh.id,
            SceneEntity::Light(light) => &mut light.id,
        };
        if self.scene.contains_id(slot) {
            *slot = new_entity_id();
        }
        let label = entity_display_name(&entity);
        let id = entity.id().clone();
        let name = entity.name().to_string();
        let cmd = match entity {
            SceneEntity::Mesh(mesh) => EditCommand::add_mesh(mesh),
            SceneEntity::Light(light) => EditCommand::add_light(light),
        };
        self.commit(cmd);
        tracing::info!("Added {}", label);
        self.notify(&format!("Added {name}."), Severity::Success, messenger::BRIEF);
        Ok(id)
    }

    /// Add a default primitive named after its kind (`Sphere_3`)
    pub fn add_shape(&mut self, shape: ShapeKind) -> Result<EntityId, EditorError> {
        let base = shape.base_name();
        let mut mesh = MeshObject::new(self.scene.next_mesh_name(base), base, shape.default_geometry());
        if shape == ShapeKind::Plane {
            mesh.transform.rotation.x = -FRAC_PI_2;
        }
        self.perform_add(SceneEntity::Mesh(mesh))
    }

    /// Add a box of the given size resting on the ground plane
    pub fn add_box_with_dimensions(
        &mut self,
        width: f64,
        height: f64,
        depth: f64,
    ) -> Result<EntityId, EditorError> {
        let [w, h, d] = [width, height, depth].map(|v| {
            if v.is_finite() {
                v.max(MIN_DIMENSION)
            } else {
                1.0
            }
        });
        let kind = format!("Box ({w}x{h}x{d})");
        let mut mesh = MeshObject::new(
            self.scene.next_mesh_name(&kind),
            kind,
            Geometry::Box {
                width: w,
                height: h,
                depth: d,
            },
        );
        mesh.transform.position.y = h / 2.0;
        self.perform_add(SceneEntity::Mesh(mesh))
    }

    pub fn add_light(&mut self, kind: LightKind) -> Result<EntityId, EditorError> {
        let light = LightObject::new(self.scene.next_light_name(kind), kind);
        self.perform_add(SceneEntity::Light(light))
    }

    /// Add a copy of the selected entity, offset slightly so both are visible
    pub fn duplicate_selected(&mut self) -> Result<EntityId, EditorError> {
        self.ensure_ready()?;
        let offset = DVec3::new(0.5, 0.0, 0.5);
        let entity = match self.selection.current() {
            Some(EntityRef::Mesh(id)) => self.scene.mesh(id).map(|m| {
                let mut copy = m.duplicate(format!("{}_copy", m.name));
                copy.transform.position += offset;
                SceneEntity::Mesh(copy)
            }),
            Some(EntityRef::Light(id)) => self.scene.light(id).map(|l| {
                let mut copy = l.duplicate(format!("{}_copy", l.name));
                copy.position = copy.position.map(|p| p + offset);
                SceneEntity::Light(copy)
            }),
            None => None,
        };
        match entity {
            Some(entity) => self.perform_add(entity),
            None => {
                self.notify(
                    "Select an object to duplicate.",
                    Severity::Warning,
                    messenger::NORMAL,
                );
                Err(EditorError::NothingSelected)
            }
        }
    }

    /// Finish a transform edit. Records one step unless nothing changed.
    pub fn perform_transform_commit(
        &mut self,
        target: &EntityRef,
        transform: Transform,
    ) -> Result<bool, EditorError> {
        self.ensure_ready()?;
        self.guard(target)?;
        let old = self
            .scene
            .transform_of(target)
            .ok_or_else(|| EditorError::UnknownEntity(target.id().clone()))?;
        let new = match target {
            EntityRef::Mesh(_) => transform,
            // Lights only carry a position
            EntityRef::Light(_) => Transform::at(transform.position),
        };
        if !new.is_finite() {
            return Err(self.reject_invalid("transform"));
        }
        Ok(self.commit_if_changed(EditCommand::update_transform(target.clone(), old, new)))
    }

    pub fn rename(&mut self, target: &EntityRef, name: &str) -> Result<bool, EditorError> {
        self.ensure_ready()?;
        self.guard(target)?;
        let old = self
            .scene
            .name_of(target)
            .ok_or_else(|| EditorError::UnknownEntity(target.id().clone()))?
            .to_string();
        let name = name.trim();
        if name.is_empty() {
            self.notify("Name cannot be empty.", Severity::Warning, messenger::NORMAL);
            return Ok(false);
        }
        Ok(self.commit_if_changed(EditCommand::rename(target.clone(), old, name.to_string())))
    }

    pub fn set_material(&mut self, id: &str, material: Material) -> Result<bool, EditorError> {
        self.ensure_ready()?;
        let target = EntityRef::Mesh(id.to_string());
        self.guard(&target)?;
        let old = self
            .scene
            .mesh(id)
            .map(|m| m.authored_material())
            .ok_or_else(|| EditorError::UnknownEntity(id.to_string()))?;
        if !material.is_finite() {
            return Err(self.reject_invalid("material"));
        }
        let opacity = material.opacity.clamp(0.0, 1.0);
        let material = Material {
            roughness: material.roughness.clamp(0.0, 1.0),
            metalness: material.metalness.clamp(0.0, 1.0),
            opacity,
            transparent: opacity < 1.0,
            ..material
        };
        Ok(self.commit_if_changed(EditCommand::update_material(id.to_string(), old, material)))
    }

    /// Edit light parameters. Fields that do not apply to the light's kind
    /// are ignored; missing applicable fields keep their current value.
    pub fn set_light_params(&mut self, id: &str, params: LightParams) -> Result<bool, EditorError> {
        self.ensure_ready()?;
        let target = EntityRef::Light(id.to_string());
        self.guard(&target)?;
        let (kind, old) = self
            .scene
            .light(id)
            .map(|l| (l.kind, l.params))
            .ok_or_else(|| EditorError::UnknownEntity(id.to_string()))?;
        if !params.is_finite() {
            return Err(self.reject_invalid("light"));
        }
        let applies = kind.default_params();
        let new = LightParams {
            color: params.color,
            intensity: params.intensity.max(0.0),
            distance: applies
                .distance
                .and(params.distance.or(old.distance))
                .map(|v| v.max(0.0)),
            decay: applies.decay.and(params.decay.or(old.decay)).map(|v| v.max(0.0)),
            angle: applies
                .angle
                .and(params.angle.or(old.angle))
                .map(|v| v.clamp(0.0, MAX_SPOT_ANGLE)),
            penumbra: applies
                .penumbra
                .and(params.penumbra.or(old.penumbra))
                .map(|v| v.clamp(0.0, 1.0)),
            target: applies.target.and(params.target.or(old.target)),
        };
        Ok(self.commit_if_changed(EditCommand::update_light(id.to_string(), old, new)))
    }

    /// Move the camera as an undoable edit
    pub fn set_camera(&mut self, camera: CameraState) -> Result<bool, EditorError> {
        self.ensure_ready()?;
        if !camera.is_finite() {
            return Err(self.reject_invalid("camera"));
        }
        let old = *self.scene.camera();
        Ok(self.commit_if_changed(EditCommand::update_camera(old, camera)))
    }

    /// Return to the configured default camera (undoable)
    pub fn reset_camera(&mut self) -> Result<bool, EditorError> {
        let camera = codec::camera_from_record(&self.settings.camera);
        self.set_camera(camera)
    }

    /// Jump to a preset view around the selected mesh, or around the current
    /// orbit pivot when nothing is selected
    pub fn set_camera_view(&mut self, view: CameraView) -> Result<(), EditorError> {
        self.ensure_ready()?;
        let camera = *self.scene.camera();
        let framed = self.selection.mesh().and_then(|id| self.scene.mesh(id)).map(|m| {
            let radius = (m.geometry.half_extents() * m.transform.scale.abs()).length();
            (m.transform.position, radius.max(1.0) * 5.0 + 2.0)
        });
        let (target, d) = framed.unwrap_or((camera.target, 10.0));
        let position = match view {
            // Tiny z offset keeps the look-at basis well defined
            CameraView::Top => target + DVec3::new(0.0, d, 0.001),
            CameraView::Front => target + DVec3::new(0.0, 0.0, d),
            CameraView::Side => target + DVec3::new(d, 0.0, 0.0),
            CameraView::Iso => target + DVec3::splat(d * 0.707),
        };
        self.scene.set_camera(CameraState {
            position,
            target,
            ..camera
        });
        self.scene.render();
        Ok(())
    }

    pub fn set_environment(&mut self, environment: EnvironmentState) -> Result<bool, EditorError> {
        self.ensure_ready()?;
        if !environment.is_finite() {
            return Err(self.reject_invalid("environment"));
        }
        let old = *self.scene.environment();
        let environment = EnvironmentState {
            ambient_intensity: environment.ambient_intensity.max(0.0),
            ..environment
        };
        Ok(self.commit_if_changed(EditCommand::update_environment(old, environment)))
    }

    /// Warn about a non-finite edit. The scene keeps its current value.
    pub(super) fn reject_invalid(&mut self, field: &'static str) -> EditorError {
        tracing::warn!("Rejected non-finite {} edit", field);
        self.notify(
            &format!("Invalid number for {field}. Reverting."),
            Severity::Warning,
            messenger::NORMAL,
        );
        EditorError::InvalidNumber(field)
    }

    fn commit_if_changed(&mut self, cmd: Option<EditCommand>) -> bool {
        match cmd {
            Some(cmd) => {
                self.commit(cmd);
                true
            }
            None => false,
        }
    }
}
