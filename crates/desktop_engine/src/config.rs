//! Typed TOML configuration for a desktop session.
//!
//! Every field has a default, so an empty document (or no document at all) yields a usable
//! configuration. Semantic checks run in [`DesktopConfig::validate`] after deserialization.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::click::DoubleClickSpeed;
use crate::entity_store::DeletePolicy;
use crate::model::WindowRect;

#[derive(Debug, Error)]
/// Failures while loading a [`DesktopConfig`].
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// Config path on disk.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    #[error("failed to parse desktop config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid desktop config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Workspace dimensions in CSS pixels.
pub struct WorkspaceConfig {
    /// Full desktop width.
    pub width: i32,
    /// Full desktop height, including the taskbar strip.
    pub height: i32,
    /// Height of the taskbar strip along the bottom edge.
    pub taskbar_height: i32,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 800,
            taskbar_height: 48,
        }
    }
}

impl WorkspaceConfig {
    /// Geometry of a maximized window: the desktop minus the taskbar strip.
    pub fn maximized_rect(&self) -> WindowRect {
        WindowRect::new(0, 0, self.width, self.height - self.taskbar_height)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// New-window placement.
pub struct WindowPlacementConfig {
    /// Offset between consecutive windows of the same kind.
    pub cascade_step: i32,
    /// Number of cascade positions before placement wraps back to the origin.
    pub cascade_slots: u32,
}

impl Default for WindowPlacementConfig {
    fn default() -> Self {
        Self {
            cascade_step: 24,
            cascade_slots: 8,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityConfig {
    pub delete_policy: DeletePolicy,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub double_click_speed: DoubleClickSpeed,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Top-level desktop session configuration.
pub struct DesktopConfig {
    /// Workspace geometry.
    pub workspace: WorkspaceConfig,
    /// Window placement.
    pub windows: WindowPlacementConfig,
    /// Entity store policy.
    pub entities: EntityConfig,
    /// Pointer input tuning.
    pub input: InputConfig,
}

impl DesktopConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and [`ConfigError::Invalid`] when values
    /// fail [`DesktopConfig::validate`].
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file cannot be read, otherwise the errors of
    /// [`DesktopConfig::from_toml_str`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let body = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&body)
    }

    /// Checks cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ws = &self.workspace;
        if ws.width <= 0 || ws.height <= 0 {
            return Err(ConfigError::Invalid(format!(
                "workspace must be positive, got {}x{}",
                ws.width, ws.height
            )));
        }
        if ws.taskbar_height < 0 || ws.taskbar_height >= ws.height {
            return Err(ConfigError::Invalid(format!(
                "taskbar_height {} must be within 0..{}",
                ws.taskbar_height, ws.height
            )));
        }
        if self.windows.cascade_slots == 0 {
            return Err(ConfigError::Invalid(
                "cascade_slots must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
