use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::snap::SnapSettings;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid settings: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("could not serialize settings: {0}")]
    Serialize(#[from] ron::Error),
}

/// Rectangle tool settings that persist to disk
#[derive(Resource, Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RectToolSettings {
    /// Grid snap amount (0.0 = disabled)
    #[serde(default = "default_grid")]
    pub grid: f32,
    /// Dissolve superfluous vertices on the extruded edge
    #[serde(default = "default_dissolve_verts")]
    pub dissolve_verts: bool,
}

fn default_grid() -> f32 {
    0.1
}

fn default_dissolve_verts() -> bool {
    true
}

impl Default for RectToolSettings {
    fn default() -> Self {
        Self {
            grid: default_grid(),
            dissolve_verts: default_dissolve_verts(),
        }
    }
}

impl RectToolSettings {
    /// Get the settings file path
    fn file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("bevy_rect_tool");
            p.push("settings.ron");
            p
        })
    }

    pub fn from_ron(content: &str) -> Result<Self, SettingsError> {
        Ok(ron::from_str(content)?)
    }

    pub fn to_ron(&self) -> Result<String, SettingsError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        Self::from_ron(&fs::read_to_string(path)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_ron()?)?;
        Ok(())
    }

    /// Load settings from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = Self::file_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Ignoring rectangle tool settings at {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Save settings to disk
    pub fn save(&self) {
        let Some(path) = Self::file_path() else {
            error!("Could not determine config directory");
            return;
        };
        match self.save_to(&path) {
            Ok(()) => info!("Rectangle tool settings saved to: {:?}", path),
            Err(e) => error!("Failed to save rectangle tool settings: {}", e),
        }
    }

    pub fn snap(&self) -> SnapSettings {
        SnapSettings::new(self.grid)
    }
}
