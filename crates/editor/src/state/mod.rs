pub mod commands;
pub mod history;
pub mod model;
pub mod scene;
pub mod selection;
pub mod settings;

pub use commands::EditCommand;
pub use history::History;
pub use model::{
    new_entity_id, CameraState, Color, EntityId, EntityRef, EnvironmentState, Geometry, LightKind,
    LightObject, LightParams, LightSatellites, Material, MeshObject, SceneEntity, ShapeKind,
    Transform,
};
pub use scene::{entity_display_name, short_id, SceneState};
pub use selection::SelectionState;
pub use settings::{EditorSettings, EnvironmentSettings, HistoryMode};
