//! UI preferences (theme, view mode) with an explicit load/save lifecycle.

use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Which face of the storefront the admin is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Admin tools visible.
    #[default]
    Developer,
    /// Exactly what customers see.
    Client,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub theme: Theme,
    pub view_mode: ViewMode,
}

#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("preference storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed preferences: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Storage for [`Preferences`]. Nothing is read or written implicitly.
pub trait PreferenceStore: Send + Sync {
    /// Stored preferences, or defaults when nothing was saved yet.
    fn load(&self) -> Result<Preferences, PreferenceError>;
    fn save(&self, preferences: &Preferences) -> Result<(), PreferenceError>;
}

/// In-memory store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryPreferenceStore {
    inner: RwLock<Option<Preferences>>,
}

impl InMemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for InMemoryPreferenceStore {
    fn load(&self) -> Result<Preferences, PreferenceError> {
        let guard = self.inner.read().unwrap_or_else(|e| e.into_inner());
        Ok(guard.as_ref().copied().unwrap_or_default())
    }

    fn save(&self, preferences: &Preferences) -> Result<(), PreferenceError> {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(*preferences);
        Ok(())
    }
}

/// JSON file store (`{"theme":"dark","view_mode":"client"}`).
#[derive(Debug, Clone)]
pub struct JsonFilePreferenceStore {
    path: PathBuf,
}

impl JsonFilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PreferenceStore for JsonFilePreferenceStore {
    fn load(&self) -> Result<Preferences, PreferenceError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Preferences::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, preferences: &Preferences) -> Result<(), PreferenceError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(preferences)?)?;
        tracing::debug!(path = %self.path.display(), "preferences saved");
        Ok(())
    }
}
