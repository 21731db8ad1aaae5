//! Editor settings

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use shared::{CameraRecord, HexColor};

use super::history::MAX_HISTORY;

/// Which undo model the editor runs with. Fixed for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryMode {
    /// Reversible edit commands
    #[default]
    Commands,
    /// Whole-scene snapshots
    Snapshots,
}

/// Background and default ambient light
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentSettings {
    pub background: HexColor,
    pub ambient_color: HexColor,
    pub ambient_intensity: f64,
}

impl Default for EnvironmentSettings {
    fn default() -> Self {
        Self {
            background: shared::default_background(),
            ambient_color: shared::default_ambient_color(),
            ambient_intensity: shared::default_ambient_intensity(),
        }
    }
}

/// All editor settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// History entries kept before the oldest is evicted
    pub max_history: usize,
    pub history_mode: HistoryMode,
    /// Emissive tint of the selected mesh / light helper
    pub highlight_color: HexColor,
    /// Camera used for new scenes and "reset camera"
    pub camera: CameraRecord,
    pub environment: EnvironmentSettings,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            max_history: MAX_HISTORY,
            history_mode: HistoryMode::default(),
            highlight_color: HexColor::from_u32(0x82aaff),
            camera: CameraRecord::default(),
            environment: EnvironmentSettings::default(),
        }
    }
}

impl EditorSettings {
    fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "archviz", "archviz-pro")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from the user config dir, or defaults if not found
    pub fn load() -> Self {
        Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Load settings from `path`; missing or unreadable files give defaults
    pub fn load_from(path: &Path) -> Self {
        let Ok(json) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        match serde_json::from_str(&json) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("ignoring invalid settings at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save settings to the user config dir
    pub fn save(&self) {
        if let Some(path) = Self::config_path() {
            if let Err(e) = self.save_to(&path) {
                tracing::warn!("could not save settings: {}", e);
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = EditorSettings::default();
        assert_eq!(s.max_history, 50);
        assert_eq!(s.history_mode, HistoryMode::Commands);
        assert_eq!(s.highlight_color.to_string(), "#82aaff");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let s: EditorSettings =
            serde_json::from_str(r#"{"history_mode": "snapshots", "max_history": 10}"#).unwrap();
        assert_eq!(s.history_mode, HistoryMode::Snapshots);
        assert_eq!(s.max_history, 10);
        assert_eq!(s.camera.fov, 60.0);
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = EditorSettings {
            max_history: 7,
            ..EditorSettings::default()
        };
        settings.save_to(&path).unwrap();
        assert_eq!(EditorSettings::load_from(&path), settings);
    }

    #[test]
    fn test_invalid_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "not json").unwrap();
        assert_eq!(EditorSettings::load_from(&path), EditorSettings::default());
        assert_eq!(
            EditorSettings::load_from(&dir.path().join("missing.json")),
            EditorSettings::default()
        );
    }
}
