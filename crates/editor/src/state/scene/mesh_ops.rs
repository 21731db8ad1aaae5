//! Mesh insertion, removal and property updates

use crate::graph::NodeSpec;
use crate::state::model::{Color, Material, MeshObject};

use super::SceneState;

impl SceneState {
    /// Add a mesh to the scene at `index` (appended when `None` or out of
    /// range) and create its graph node. Returns the index used.
    pub(crate) fn insert_mesh(&mut self, index: Option<usize>, mut mesh: MeshObject) -> usize {
        mesh.node = Some(self.graph_mut().add_node(NodeSpec::Mesh(&mesh)));
        let index = index
            .filter(|&i| i <= self.meshes.len())
            .unwrap_or(self.meshes.len());
        self.meshes.insert(index, mesh);
        self.version += 1;
        index
    }

    /// Take a mesh out of the scene, releasing its node. The returned mesh
    /// carries its authored material and no graph handle.
    pub(crate) fn remove_mesh(&mut self, id: &str) -> Option<(usize, MeshObject)> {
        let index = self.meshes.iter().position(|m| m.id == id)?;
        let mut mesh = self.meshes.remove(index);
        if let Some(node) = mesh.node.take() {
            if self.graph().gizmo_node() == Some(node) {
                self.graph_mut().detach_gizmo();
            }
            self.graph_mut().remove_node(node);
        }
        if let Some(saved) = mesh.saved_emissive.take() {
            mesh.material.emissive = saved;
        }
        self.version += 1;
        Some((index, mesh))
    }

    /// Replace a mesh's material. A selection highlight stays on top of the
    /// new emissive value.
    pub(crate) fn set_mesh_material(&mut self, id: &str, material: Material) -> bool {
        let Some(mesh) = self.mesh_mut(id) else {
            return false;
        };
        match mesh.saved_emissive {
            Some(_) => {
                let highlight = mesh.material.emissive;
                mesh.saved_emissive = Some(material.emissive);
                mesh.material = Material {
                    emissive: highlight,
                    ..material
                };
            }
            None => mesh.material = material,
        }
        self.sync_mesh(id);
        true
    }

    /// Swap the emissive tint for `highlight`, or restore the saved value
    /// when `None`
    pub(crate) fn set_mesh_highlight(&mut self, id: &str, highlight: Option<Color>) {
        let Some(mesh) = self.mesh_mut(id) else {
            return;
        };
        match highlight {
            Some(color) => {
                if mesh.saved_emissive.is_none() {
                    mesh.saved_emissive = Some(mesh.material.emissive);
                }
                mesh.material.emissive = color;
            }
            None => match mesh.saved_emissive.take() {
                Some(saved) => mesh.material.emissive = saved,
                None => return,
            },
        }
        self.sync_mesh(id);
    }

    /// Push the mesh's current state to its graph node
    pub(crate) fn sync_mesh(&mut self, id: &str) {
        let Some(index) = self.meshes.iter().position(|m| m.id == id) else {
            return;
        };
        self.version += 1;
        if let Some(node) = self.meshes[index].node {
            // Split borrow: `graph` and `meshes` are disjoint fields
            let Self { graph, meshes, .. } = self;
            graph.update_node(node, NodeSpec::Mesh(&meshes[index]));
        }
    }

    /// Next free name for a new mesh of `base` kind (`Box_3`)
    pub fn next_mesh_name(&self, base: &str) -> String {
        format!("{}_{}", base, self.meshes.len() + 1)
    }
}
