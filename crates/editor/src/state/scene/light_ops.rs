//! Light insertion, removal and parameter updates.
//!
//! A light owns up to three graph nodes (the light itself, an aim target and
//! a pickable helper). They are created and released only here.

use glam::DVec3;

use crate::graph::NodeSpec;
use crate::state::model::{Color, LightKind, LightObject, LightParams, LightSatellites};

use super::SceneState;

impl SceneState {
    /// Add a light at `index` (appended when `None` or out of range) with all
    /// of its satellites. Returns the index used.
    pub(crate) fn insert_light(&mut self, index: Option<usize>, mut light: LightObject) -> usize {
        let graph = self.graph_mut();
        let node = graph.add_node(NodeSpec::Light(&light));
        let target = light.kind.has_target().then(|| {
            graph.add_node(NodeSpec::LightTarget {
                light: &light.id,
                position: light.params.target.unwrap_or(DVec3::ZERO),
            })
        });
        let helper = light.kind.has_helper().then(|| {
            graph.add_node(NodeSpec::LightHelper {
                light: &light,
                tint: light.helper_tint,
            })
        });
        light.satellites = LightSatellites {
            node: Some(node),
            target,
            helper,
        };

        let index = index
            .filter(|&i| i <= self.lights.len())
            .unwrap_or(self.lights.len());
        self.lights.insert(index, light);
        self.version += 1;
        index
    }

    /// Take a light out of the scene together with its helper and target
    pub(crate) fn remove_light(&mut self, id: &str) -> Option<(usize, LightObject)> {
        let index = self.lights.iter().position(|l| l.id == id)?;
        let mut light = self.lights.remove(index);
        let satellites = std::mem::take(&mut light.satellites);
        let gizmo = self.graph().gizmo_node();
        let graph = self.graph_mut();
        if gizmo.is_some() && (gizmo == satellites.node || gizmo == satellites.helper) {
            graph.detach_gizmo();
        }
        for node in [satellites.helper, satellites.target, satellites.node]
            .into_iter()
            .flatten()
        {
            graph.remove_node(node);
        }
        if let Some(saved) = light.saved_tint.take() {
            light.helper_tint = saved;
        }
        self.version += 1;
        Some((index, light))
    }

    pub(crate) fn set_light_params(&mut self, id: &str, params: LightParams) -> bool {
        let Some(light) = self.light_mut(id) else {
            return false;
        };
        light.params = params;
        self.sync_light(id);
        true
    }

    /// Tint the helper with `highlight`, or restore its resting color
    pub(crate) fn set_light_highlight(&mut self, id: &str, highlight: Option<Color>) {
        let Some(light) = self.light_mut(id) else {
            return;
        };
        match highlight {
            Some(color) => {
                if light.saved_tint.is_none() {
                    light.saved_tint = Some(light.helper_tint);
                }
                light.helper_tint = color;
            }
            None => match light.saved_tint.take() {
                Some(saved) => light.helper_tint = saved,
                None => return,
            },
        }
        self.sync_light(id);
    }

    /// Push the light's current state to all of its nodes
    pub(crate) fn sync_light(&mut self, id: &str) {
        let Some(index) = self.lights.iter().position(|l| l.id == id) else {
            return;
        };
        self.version += 1;
        let Self { graph, lights, .. } = self;
        let light = &lights[index];
        let satellites = light.satellites;
        if let Some(node) = satellites.node {
            graph.update_node(node, NodeSpec::Light(light));
        }
        if let Some(target) = satellites.target {
            graph.update_node(
                target,
                NodeSpec::LightTarget {
                    light: &light.id,
                    position: light.params.target.unwrap_or(DVec3::ZERO),
                },
            );
        }
        if let Some(helper) = satellites.helper {
            graph.update_node(
                helper,
                NodeSpec::LightHelper {
                    light,
                    tint: light.helper_tint,
                },
            );
        }
    }

    /// Next free name for a new light (`PointLight_2`)
    pub fn next_light_name(&self, kind: LightKind) -> String {
        format!("{}Light_{}", kind.as_str(), self.lights.len() + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::color::linear_from_hex;
    use crate::graph::{MemoryGraph, NodeKind};

    fn scene() -> (SceneState, MemoryGraph) {
        let graph = MemoryGraph::new();
        (SceneState::new(Box::new(graph.clone())), graph)
    }

    #[test]
    fn test_satellites_follow_kind() {
        let (mut scene, graph) = scene();
        scene.insert_light(None, LightObject::new("PointLight_1", LightKind::Point));
        scene.insert_light(None, LightObject::new("SpotLight_2", LightKind::Spot));
        scene.insert_light(None, LightObject::new("AmbientLight_3", LightKind::Ambient));

        // point: light + helper, spot: light + target + helper, ambient: light
        assert_eq!(graph.node_count(), 6);
        assert_eq!(graph.count_where(|n| n.kind == NodeKind::LightTarget), 1);
        let ambient = &scene.lights()[2];
        assert!(ambient.satellites().helper.is_none());
        assert!(ambient.satellites().is_attached());
    }

    #[test]
    fn test_remove_releases_every_satellite() {
        let (mut scene, graph) = scene();
        let spot = LightObject::new("SpotLight_1", LightKind::Spot);
        let id = spot.id.clone();
        scene.insert_light(None, spot);
        let helper = scene.light(&id).unwrap().satellites().helper.unwrap();
        scene.graph_mut().attach_gizmo(helper);

        let (index, parked) = scene.remove_light(&id).unwrap();
        assert_eq!(index, 0);
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.gizmo(), None);
        assert!(!parked.satellites().is_attached());
    }

    #[test]
    fn test_params_update_moves_target() {
        let (mut scene, graph) = scene();
        let light = LightObject::new("DirectionalLight_1", LightKind::Directional);
        let id = light.id.clone();
        scene.insert_light(None, light);
        let mut params = scene.light(&id).unwrap().params;
        params.target = Some(DVec3::new(1.0, 0.0, -1.0));
        params.intensity = 2.0;
        assert!(scene.set_light_params(&id, params));

        let target = scene.light(&id).unwrap().satellites().target.unwrap();
        assert_eq!(graph.node(target).unwrap().position, DVec3::new(1.0, 0.0, -1.0));
        assert!(!scene.set_light_params("missing", params));
    }

    #[test]
    fn test_helper_highlight_round_trip() {
        let (mut scene, _graph) = scene();
        let light = LightObject::new("PointLight_1", LightKind::Point);
        let id = light.id.clone();
        scene.insert_light(None, light);
        let glow = Color::new(0.2, 0.4, 1.0);
        scene.set_light_highlight(&id, Some(glow));
        assert_eq!(scene.light(&id).unwrap().helper_tint(), glow);
        scene.set_light_highlight(&id, None);
        assert_eq!(
            scene.light(&id).unwrap().helper_tint(),
            linear_from_hex(LightKind::Point.helper_color())
        );
    }

    #[test]
    fn test_next_light_name() {
        let (scene, _graph) = scene();
        assert_eq!(scene.next_light_name(LightKind::Spot), "SpotLight_1");
    }
}
