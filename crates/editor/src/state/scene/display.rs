//! Display helper functions for entities

use crate::state::model::SceneEntity;

/// Get display name for an entity
pub fn entity_display_name(entity: &SceneEntity) -> String {
    format!("{} ({})", entity.name(), short_id(entity.id()))
}

/// Get shortened ID (first 8 characters)
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}
