//! In-memory scene graph used by the binary, the harness and the tests.
//!
//! Picking is a top-down projection onto the XZ plane: the viewport point
//! `(x, y)` is treated as world `(x, z)` and hits the nearest node footprint.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use glam::DVec3;

use super::{NodeHandle, NodeSpec, SceneGraph};
use crate::state::{CameraState, Color, EntityId, EnvironmentState, LightKind};

/// Footprint half size used for light helpers
const HELPER_HALF_EXTENT: f64 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Mesh,
    Light(LightKind),
    LightTarget,
    LightHelper(LightKind),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryNode {
    pub kind: NodeKind,
    pub entity: EntityId,
    pub position: DVec3,
    /// World-space half size of the pick footprint
    pub half_extents: DVec3,
    /// Mesh emissive or helper tint
    pub tint: Option<Color>,
    pub updates: u32,
}

impl MemoryNode {
    fn from_spec(spec: NodeSpec<'_>) -> Self {
        match spec {
            NodeSpec::Mesh(mesh) => Self {
                kind: NodeKind::Mesh,
                entity: mesh.id.clone(),
                position: mesh.transform.position,
                half_extents: mesh.geometry.half_extents() * mesh.transform.scale.abs(),
                tint: Some(mesh.material.emissive),
                updates: 0,
            },
            NodeSpec::Light(light) => Self {
                kind: NodeKind::Light(light.kind),
                entity: light.id.clone(),
                position: light.position.unwrap_or(DVec3::ZERO),
                half_extents: DVec3::ZERO,
                tint: None,
                updates: 0,
            },
            NodeSpec::LightTarget { light, position } => Self {
                kind: NodeKind::LightTarget,
                entity: light.clone(),
                position,
                half_extents: DVec3::ZERO,
                tint: None,
                updates: 0,
            },
            NodeSpec::LightHelper { light, tint } => Self {
                kind: NodeKind::LightHelper(light.kind),
                entity: light.id.clone(),
                position: light.position.unwrap_or(DVec3::ZERO),
                half_extents: DVec3::splat(HELPER_HALF_EXTENT),
                tint: Some(tint),
                updates: 0,
            },
        }
    }

    fn is_pickable(&self) -> bool {
        matches!(self.kind, NodeKind::Mesh | NodeKind::LightHelper(_))
    }

    fn covers(&self, x: f64, z: f64) -> bool {
        (x - self.position.x).abs() <= self.half_extents.x
            && (z - self.position.z).abs() <= self.half_extents.z
    }
}

#[derive(Debug, Default)]
struct GraphInner {
    nodes: BTreeMap<NodeHandle, MemoryNode>,
    next: u64,
    gizmo: Option<NodeHandle>,
    camera: Option<CameraState>,
    environment: Option<EnvironmentState>,
    frames: u64,
}

/// Cheaply clonable handle; clones share the same graph so a test can keep
/// one while the editor owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryGraph {
    inner: Rc<RefCell<GraphInner>>,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.inner.borrow().nodes.len()
    }

    pub fn node(&self, handle: NodeHandle) -> Option<MemoryNode> {
        self.inner.borrow().nodes.get(&handle).cloned()
    }

    /// Number of live nodes matching `pred`
    pub fn count_where(&self, pred: impl Fn(&MemoryNode) -> bool) -> usize {
        self.inner.borrow().nodes.values().filter(|n| pred(n)).count()
    }

    /// Live nodes belonging to `entity`
    pub fn nodes_for(&self, entity: &str) -> Vec<MemoryNode> {
        self.inner
            .borrow()
            .nodes
            .values()
            .filter(|n| n.entity == entity)
            .cloned()
            .collect()
    }

    pub fn gizmo(&self) -> Option<NodeHandle> {
        self.inner.borrow().gizmo
    }

    pub fn camera(&self) -> Option<CameraState> {
        self.inner.borrow().camera
    }

    pub fn environment(&self) -> Option<EnvironmentState> {
        self.inner.borrow().environment
    }

    pub fn frames_rendered(&self) -> u64 {
        self.inner.borrow().frames
    }
}

impl SceneGraph for MemoryGraph {
    fn add_node(&mut self, spec: NodeSpec<'_>) -> NodeHandle {
        let mut inner = self.inner.borrow_mut();
        inner.next += 1;
        let handle = NodeHandle(inner.next);
        inner.nodes.insert(handle, MemoryNode::from_spec(spec));
        handle
    }

    fn update_node(&mut self, node: NodeHandle, spec: NodeSpec<'_>) {
        let mut inner = self.inner.borrow_mut();
        match inner.nodes.get_mut(&node) {
            Some(existing) => {
                let updates = existing.updates + 1;
                *existing = MemoryNode::from_spec(spec);
                existing.updates = updates;
            }
            None => tracing::warn!("update of unknown node {:?}", node),
        }
    }

    fn remove_node(&mut self, node: NodeHandle) {
        let mut inner = self.inner.borrow_mut();
        if inner.nodes.remove(&node).is_none() {
            tracing::warn!("removal of unknown node {:?}", node);
        }
        if inner.gizmo == Some(node) {
            inner.gizmo = None;
        }
    }

    fn raycast(&self, x: f64, y: f64) -> Option<NodeHandle> {
        let inner = self.inner.borrow();
        let hit_distance = |n: &MemoryNode| {
            let dx = x - n.position.x;
            let dz = y - n.position.z;
            dx * dx + dz * dz
        };
        // Meshes win over helpers at equal distance
        let mut best: Option<(NodeHandle, bool, f64)> = None;
        for (&handle, node) in inner.nodes.iter() {
            if !node.is_pickable() || !node.covers(x, y) {
                continue;
            }
            let is_helper = matches!(node.kind, NodeKind::LightHelper(_));
            let d = hit_distance(node);
            let better = match best {
                None => true,
                Some((_, best_helper, best_d)) => {
                    (is_helper, d) < (best_helper, best_d)
                }
            };
            if better {
                best = Some((handle, is_helper, d));
            }
        }
        best.map(|(handle, _, _)| handle)
    }

    fn attach_gizmo(&mut self, node: NodeHandle) {
        self.inner.borrow_mut().gizmo = Some(node);
    }

    fn detach_gizmo(&mut self) {
        self.inner.borrow_mut().gizmo = None;
    }

    fn gizmo_node(&self) -> Option<NodeHandle> {
        self.inner.borrow().gizmo
    }

    fn apply_camera(&mut self, camera: &CameraState) {
        self.inner.borrow_mut().camera = Some(*camera);
    }

    fn apply_environment(&mut self, environment: &EnvironmentState) {
        self.inner.borrow_mut().environment = Some(*environment);
    }

    fn render_frame(&mut self) {
        self.inner.borrow_mut().frames += 1;
    }
}
