use crate::state::model::{Color, EntityRef};
use crate::state::scene::SceneState;

/// Single-entity selection. At most one mesh or light is selected, never
/// both.
#[derive(Debug, Default, Clone)]
pub struct SelectionState {
    current: Option<EntityRef>,
}

impl SelectionState {
    pub fn current(&self) -> Option<&EntityRef> {
        self.current.as_ref()
    }

    /// Selected mesh id, if the selection is a mesh
    pub fn mesh(&self) -> Option<&str> {
        match &self.current {
            Some(EntityRef::Mesh(id)) => Some(id),
            _ => None,
        }
    }

    /// Selected light id, if the selection is a light
    pub fn light(&self) -> Option<&str> {
        match &self.current {
            Some(EntityRef::Light(id)) => Some(id),
            _ => None,
        }
    }

    pub fn is_selected(&self, target: &EntityRef) -> bool {
        self.current.as_ref() == Some(target)
    }

    /// Change the selection and keep the scene's visual state in step:
    /// un-highlight the previous entity, move the gizmo, highlight the new
    /// one. Targets that are not in the scene select nothing.
    pub fn apply(&mut self, scene: &mut SceneState, highlight: Color, target: Option<EntityRef>) {
        if let Some(previous) = self.current.take() {
            set_highlight(scene, &previous, None);
        }
        scene.graph_mut().detach_gizmo();

        let target = target.filter(|t| scene.contains(t));
        if let Some(t) = &target {
            set_highlight(scene, t, Some(highlight));
            if let Some(anchor) = scene.gizmo_anchor(t) {
                scene.graph_mut().attach_gizmo(anchor);
            }
        }
        self.current = target;
    }
}

fn set_highlight(scene: &mut SceneState, target: &EntityRef, highlight: Option<Color>) {
    match target {
        EntityRef::Mesh(id) => scene.set_mesh_highlight(id, highlight),
        EntityRef::Light(id) => scene.set_light_highlight(id, highlight),
    }
}
