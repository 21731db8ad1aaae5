//! Scene state management
//!
//! Owns the live meshes and lights plus camera and environment, and keeps the
//! graphics collaborator in step with every change.

mod display;
mod light_ops;
mod mesh_ops;
mod transform_ops;

pub use display::{entity_display_name, short_id};

use crate::graph::{NodeHandle, NullGraph, SceneGraph};

use super::model::{CameraState, EntityId, EntityRef, EnvironmentState, LightObject, MeshObject};

/// Live scene contents mirrored into a [`SceneGraph`]
pub struct SceneState {
    pub(crate) meshes: Vec<MeshObject>,
    pub(crate) lights: Vec<LightObject>,
    pub(crate) camera: CameraState,
    pub(crate) environment: EnvironmentState,
    graph: Box<dyn SceneGraph>,
    /// Monotonically increasing version counter for cache invalidation
    pub(crate) version: u64,
}

impl Default for SceneState {
    fn default() -> Self {
        Self::new(Box::new(NullGraph::default()))
    }
}

impl SceneState {
    pub fn new(graph: Box<dyn SceneGraph>) -> Self {
        let mut state = Self {
            meshes: Vec::new(),
            lights: Vec::new(),
            camera: CameraState::default(),
            environment: EnvironmentState::default(),
            graph,
            version: 0,
        };
        state.graph.apply_camera(&state.camera);
        state.graph.apply_environment(&state.environment);
        state
    }

    /// Current scene version (increments on every mutation)
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Meshes in insertion order
    pub fn meshes(&self) -> &[MeshObject] {
        &self.meshes
    }

    /// Lights in insertion order
    pub fn lights(&self) -> &[LightObject] {
        &self.lights
    }

    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    pub fn environment(&self) -> &EnvironmentState {
        &self.environment
    }

    pub fn mesh(&self, id: &str) -> Option<&MeshObject> {
        self.meshes.iter().find(|m| m.id == id)
    }

    pub fn light(&self, id: &str) -> Option<&LightObject> {
        self.lights.iter().find(|l| l.id == id)
    }

    pub(crate) fn mesh_mut(&mut self, id: &str) -> Option<&mut MeshObject> {
        self.meshes.iter_mut().find(|m| m.id == id)
    }

    pub(crate) fn light_mut(&mut self, id: &str) -> Option<&mut LightObject> {
        self.lights.iter_mut().find(|l| l.id == id)
    }

    /// Resolve an id to a reference of the right kind
    pub fn entity_ref(&self, id: &str) -> Option<EntityRef> {
        if self.mesh(id).is_some() {
            Some(EntityRef::Mesh(id.to_string()))
        } else if self.light(id).is_some() {
            Some(EntityRef::Light(id.to_string()))
        } else {
            None
        }
    }

    pub fn contains(&self, target: &EntityRef) -> bool {
        match target {
            EntityRef::Mesh(id) => self.mesh(id).is_some(),
            EntityRef::Light(id) => self.light(id).is_some(),
        }
    }

    /// True if any mesh or light already uses `id`
    pub fn contains_id(&self, id: &str) -> bool {
        self.entity_ref(id).is_some()
    }

    /// Entity owning a graph node (mesh node, light node or light helper)
    pub fn entity_for_node(&self, node: NodeHandle) -> Option<EntityRef> {
        if let Some(mesh) = self.meshes.iter().find(|m| m.node == Some(node)) {
            return Some(EntityRef::Mesh(mesh.id.clone()));
        }
        self.lights
            .iter()
            .find(|l| l.satellites.node == Some(node) || l.satellites.helper == Some(node))
            .map(|l| EntityRef::Light(l.id.clone()))
    }

    /// Node the gizmo should attach to for `target`
    pub(crate) fn gizmo_anchor(&self, target: &EntityRef) -> Option<NodeHandle> {
        match target {
            EntityRef::Mesh(id) => self.mesh(id)?.node,
            EntityRef::Light(id) => {
                let light = self.light(id)?;
                light.position?;
                light.satellites.node
            }
        }
    }

    pub fn graph(&self) -> &dyn SceneGraph {
        self.graph.as_ref()
    }

    pub(crate) fn graph_mut(&mut self) -> &mut dyn SceneGraph {
        self.graph.as_mut()
    }

    /// Ask the collaborator to draw a frame
    pub fn render(&mut self) {
        self.graph.render_frame();
    }

    /// Remove every mesh and light, releasing their graph nodes
    pub(crate) fn clear_entities(&mut self) {
        self.graph.detach_gizmo();
        let ids: Vec<EntityId> = self.meshes.iter().map(|m| m.id.clone()).collect();
        for id in ids {
            self.remove_mesh(&id);
        }
        let ids: Vec<EntityId> = self.lights.iter().map(|l| l.id.clone()).collect();
        for id in ids {
            self.remove_light(&id);
        }
        self.version += 1;
    }
}
