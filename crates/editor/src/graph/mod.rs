//! Graphics collaborator seam.
//!
//! The editor never draws anything itself. It mirrors entities into a
//! [`SceneGraph`] and asks it to pick, attach the transform gizmo and render.

mod memory;

pub use memory::{MemoryGraph, MemoryNode, NodeKind};

use glam::DVec3;

use crate::state::{CameraState, Color, EntityId, EnvironmentState, LightObject, MeshObject};

/// Opaque handle to a node owned by the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeHandle(pub u64);

/// What a node should look like
#[derive(Debug, Clone, Copy)]
pub enum NodeSpec<'a> {
    Mesh(&'a MeshObject),
    Light(&'a LightObject),
    /// Aim point of a directional or spot light
    LightTarget { light: &'a EntityId, position: DVec3 },
    /// Pickable gizmo drawn at a light
    LightHelper { light: &'a LightObject, tint: Color },
}

pub trait SceneGraph {
    /// Create a node mirroring `spec`
    fn add_node(&mut self, spec: NodeSpec<'_>) -> NodeHandle;

    /// Refresh an existing node after its entity changed
    fn update_node(&mut self, node: NodeHandle, spec: NodeSpec<'_>);

    /// Remove a node and release its resources
    fn remove_node(&mut self, node: NodeHandle);

    /// Node under the viewport point (normalized device coordinates)
    fn raycast(&self, x: f64, y: f64) -> Option<NodeHandle>;

    fn attach_gizmo(&mut self, node: NodeHandle);
    fn detach_gizmo(&mut self);
    fn gizmo_node(&self) -> Option<NodeHandle>;

    fn apply_camera(&mut self, camera: &CameraState);
    fn apply_environment(&mut self, environment: &EnvironmentState);

    fn render_frame(&mut self);
}

/// Graph used when no real collaborator could be created. Accepts and
/// discards everything.
#[derive(Debug, Default)]
pub struct NullGraph {
    next: u64,
}

impl SceneGraph for NullGraph {
    fn add_node(&mut self, _spec: NodeSpec<'_>) -> NodeHandle {
        self.next += 1;
        NodeHandle(self.next)
    }

    fn update_node(&mut self, _node: NodeHandle, _spec: NodeSpec<'_>) {}
    fn remove_node(&mut self, _node: NodeHandle) {}

    fn raycast(&self, _x: f64, _y: f64) -> Option<NodeHandle> {
        None
    }

    fn attach_gizmo(&mut self, _node: NodeHandle) {}
    fn detach_gizmo(&mut self) {}

    fn gizmo_node(&self) -> Option<NodeHandle> {
        None
    }

    fn apply_camera(&mut self, _camera: &CameraState) {}
    fn apply_environment(&mut self, _environment: &EnvironmentState) {}
    fn render_frame(&mut self) {}
}
