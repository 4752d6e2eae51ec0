//! Persisted user preferences
//!
//! Stored as JSON under the platform config directory. A missing, unreadable or
//! malformed file is not an error: the defaults are used instead.

use super::error::ConfigError;
use super::server::{normalize_base_url, DEFAULT_BASE_URL};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "fabric-desk";
const FILE_NAME: &str = "preferences.json";

/// User preferences shared with the UI layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Preferences {
    pub base_url: String,
    pub theme: String,
    pub auto_start_server: bool,
    pub last_pattern: String,
    pub last_model: String,
    pub last_vendor: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            theme: "dark".to_string(),
            auto_start_server: true,
            last_pattern: String::new(),
            last_model: String::new(),
            last_vendor: String::new(),
        }
    }
}

/// File-backed preferences location.
#[derive(Debug, Clone)]
pub struct PreferencesStore {
    path: PathBuf,
}

impl PreferencesStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/fabric-desk/preferences.json`
    pub fn default_location() -> Result<Self, ConfigError> {
        let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(Self::new(dir.join(APP_DIR).join(FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load preferences, falling back to defaults on any failure.
    pub fn load(&self) -> Preferences {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                tracing::debug!(path = %self.path.display(), error = %e, "No readable preferences, using defaults");
                return Preferences::default();
            }
        };

        match serde_json::from_str::<Preferences>(&content) {
            Ok(mut prefs) => {
                prefs.base_url = normalize_base_url(&prefs.base_url);
                prefs
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Malformed preferences, using defaults");
                Preferences::default()
            }
        }
    }

    /// The base URL present in the file, normalized. Absent, empty or unreadable
    /// yields `None`; the built-in default never counts as saved.
    pub fn saved_base_url(&self) -> Option<String> {
        #[derive(Deserialize)]
        struct SavedBaseUrl {
            #[serde(rename = "baseUrl")]
            base_url: Option<String>,
        }

        let content = std::fs::read_to_string(&self.path).ok()?;
        let saved: SavedBaseUrl = serde_json::from_str(&content).ok()?;
        saved
            .base_url
            .map(|url| normalize_base_url(&url))
            .filter(|url| !url.is_empty())
    }

    /// Write preferences as pretty JSON, creating the directory if needed.
    pub fn save(&self, prefs: &Preferences) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut prefs = prefs.clone();
        prefs.base_url = normalize_base_url(&prefs.base_url);
        let json = serde_json::to_string_pretty(&prefs)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        std::fs::write(&self.path, json)?;
        tracing::info!(path = %self.path.display(), "Preferences saved");
        Ok(())
    }
}
