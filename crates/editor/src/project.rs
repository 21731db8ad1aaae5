//! Saved projects.
//!
//! All projects live as one JSON array under [`PROJECTS_KEY`] in a
//! key-value store. Each record carries the scene as snapshot JSON.

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::state::new_entity_id;

/// Storage key of the project list
pub const PROJECTS_KEY: &str = "archVizProProjects_v3";

/// String key-value persistence
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store in the user's data directory
    pub fn open_default() -> Option<Self> {
        directories::ProjectDirs::from("com", "archviz", "archviz-pro")
            .map(|dirs| Self::new(dirs.data_dir()))
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(self.path(key)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path(key), value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        match std::fs::remove_file(self.path(key)) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    pub id: String,
    pub project_name: String,
    /// Snapshot JSON; absent until the project is first opened or saved
    #[serde(default)]
    pub scene_data: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

pub struct ProjectStore<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> ProjectStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// All projects, most recently modified first. A corrupt list is
    /// discarded.
    pub fn list(&mut self) -> Result<Vec<ProjectRecord>, StoreError> {
        let mut projects = self.read()?;
        projects.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
        Ok(projects)
    }

    pub fn create(&mut self, name: &str) -> Result<ProjectRecord, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptyName);
        }
        let now = Utc::now();
        let record = ProjectRecord {
            id: new_entity_id(),
            project_name: name.to_string(),
            scene_data: None,
            created_at: now,
            last_modified: now,
        };
        let mut projects = self.read()?;
        projects.push(record.clone());
        self.write(&projects)?;
        tracing::info!("Created project {} ({})", record.project_name, record.id);
        Ok(record)
    }

    pub fn load(&mut self, id: &str) -> Result<ProjectRecord, StoreError> {
        self.read()?
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Store `scene_json` as the project's scene and bump its timestamp
    pub fn save_scene(&mut self, id: &str, scene_json: &str) -> Result<(), StoreError> {
        let mut projects = self.read()?;
        let project = projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        project.scene_data = Some(scene_json.to_string());
        project.last_modified = Utc::now();
        self.write(&projects)
    }

    /// Returns whether a project was removed
    pub fn delete(&mut self, id: &str) -> Result<bool, StoreError> {
        let mut projects = self.read()?;
        let before = projects.len();
        projects.retain(|p| p.id != id);
        if projects.len() == before {
            return Ok(false);
        }
        self.write(&projects)?;
        Ok(true)
    }

    fn read(&mut self) -> Result<Vec<ProjectRecord>, StoreError> {
        let Some(text) = self.store.get(PROJECTS_KEY)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&text) {
            Ok(projects) => Ok(projects),
            Err(e) => {
                tracing::warn!("Discarding unreadable project list: {}", e);
                self.store.remove(PROJECTS_KEY)?;
                Ok(Vec::new())
            }
        }
    }

    fn write(&mut self, projects: &[ProjectRecord]) -> Result<(), StoreError> {
        let json = serde_json::to_string(projects)?;
        self.store.set(PROJECTS_KEY, &json)
    }
}
