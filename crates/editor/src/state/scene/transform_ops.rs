//! Transform, naming, camera and environment updates

use crate::state::model::{CameraState, EntityRef, EnvironmentState, Transform};

use super::SceneState;

impl SceneState {
    /// Current transform of an entity. Ambient lights have none.
    pub fn transform_of(&self, target: &EntityRef) -> Option<Transform> {
        match target {
            EntityRef::Mesh(id) => self.mesh(id).map(|m| m.transform),
            EntityRef::Light(id) => self.light(id).and_then(|l| l.transform()),
        }
    }

    /// Set an entity's transform. Lights only take the position.
    pub(crate) fn set_transform(&mut self, target: &EntityRef, transform: Transform) -> bool {
        match target {
            EntityRef::Mesh(id) => {
                let Some(mesh) = self.mesh_mut(id) else {
                    return false;
                };
                mesh.transform = transform;
                self.sync_mesh(id);
            }
            EntityRef::Light(id) => {
                let Some(light) = self.light_mut(id) else {
                    return false;
                };
                if !light.kind.has_position() {
                    return false;
                }
                light.position = Some(transform.position);
                self.sync_light(id);
            }
        }
        true
    }

    pub(crate) fn set_name(&mut self, target: &EntityRef, name: &str) -> bool {
        let slot = match target {
            EntityRef::Mesh(id) => self.mesh_mut(id).map(|m| &mut m.name),
            EntityRef::Light(id) => self.light_mut(id).map(|l| &mut l.name),
        };
        match slot {
            Some(slot) => {
                *slot = name.to_string();
                self.version += 1;
                true
            }
            None => false,
        }
    }

    pub fn name_of(&self, target: &EntityRef) -> Option<&str> {
        match target {
            EntityRef::Mesh(id) => self.mesh(id).map(|m| m.name.as_str()),
            EntityRef::Light(id) => self.light(id).map(|l| l.name.as_str()),
        }
    }

    pub(crate) fn set_camera(&mut self, camera: CameraState) {
        self.camera = camera;
        self.graph_mut().apply_camera(&camera);
        self.version += 1;
    }

    pub(crate) fn set_environment(&mut self, environment: EnvironmentState) {
        self.environment = environment;
        self.graph_mut().apply_environment(&environment);
        self.version += 1;
    }
}

#[cfg(test)]
mod tests {
    use glam::DVec3;

    use super::*;
    use crate::graph::MemoryGraph;
    use crate::state::model::{Geometry, LightKind, LightObject, MeshObject};

    #[test]
    fn test_mesh_transform_reaches_graph() {
        let graph = MemoryGraph::new();
        let mut scene = SceneState::new(Box::new(graph.clone()));
        let mesh = MeshObject::new("Box_1", "Box", Geometry::unit_box());
        let target = EntityRef::Mesh(mesh.id.clone());
        scene.insert_mesh(None, mesh);

        let moved = Transform::at(DVec3::new(2.0, 0.0, 0.0));
        assert!(scene.set_transform(&target, moved));
        assert_eq!(scene.transform_of(&target), Some(moved));
        let node = scene.mesh(target.id()).and_then(|m| m.node()).unwrap();
        assert_eq!(graph.node(node).unwrap().position.x, 2.0);
    }

    #[test]
    fn test_ambient_light_has_no_transform() {
        let mut scene = SceneState::default();
        let light = LightObject::new("AmbientLight_1", LightKind::Ambient);
        let target = EntityRef::Light(light.id.clone());
        scene.insert_light(None, light);
        assert_eq!(scene.transform_of(&target), None);
        assert!(!scene.set_transform(&target, Transform::default()));
    }

    #[test]
    fn test_rename() {
        let mut scene = SceneState::default();
        let light = LightObject::new("PointLight_1", LightKind::Point);
        let target = EntityRef::Light(light.id.clone());
        scene.insert_light(None, light);
        assert!(scene.set_name(&target, "Key"));
        assert_eq!(scene.name_of(&target), Some("Key"));
        assert!(!scene.set_name(&EntityRef::Mesh("nope".into()), "x"));
    }

    #[test]
    fn test_camera_applies_to_graph() {
        let graph = MemoryGraph::new();
        let mut scene = SceneState::new(Box::new(graph.clone()));
        assert_eq!(graph.camera(), Some(CameraState::default()));
        let camera = CameraState {
            fov_degrees: 45.0,
            ..CameraState::default()
        };
        scene.set_camera(camera);
        assert_eq!(graph.camera().map(|c| c.fov_degrees), Some(45.0));
    }
}
