//! Co-op configuration (`ghostlink.toml`)
//!
//! Every field has a default, so an empty file (or no file) yields a working
//! setup. Values are checked by [`CoopConfig::validate`] when loaded.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Co-op session configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoopConfig {
    /// Frames between heartbeats. Lower = smoother ghost, more bandwidth (default: 6)
    #[serde(default = "default_sync_interval")]
    pub sync_interval: u32,
    /// Name of the map object that stands in for the remote player
    #[serde(default = "default_ghost_marker")]
    pub ghost_marker: String,
    /// Manhattan distance above which the ghost snaps instead of walking (default: 5)
    #[serde(default = "default_teleport_threshold")]
    pub teleport_threshold: u32,
    /// Distance above which the ghost walks at catch-up speed (default: 2)
    #[serde(default = "default_catch_up_distance")]
    pub catch_up_distance: u32,
    /// Normal ghost move speed (default: 4)
    #[serde(default = "default_walk_speed")]
    pub walk_speed: u8,
    /// Move speed while catching up (default: 5)
    #[serde(default = "default_catch_up_speed")]
    pub catch_up_speed: u8,
    /// Reset the remote snapshot to neutral when the link closes (default: true)
    #[serde(default = "default_true")]
    pub clear_remote_on_close: bool,
    /// Host frame rate, used to time indicator animation (default: 60)
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
    /// Combat indicator appearance
    #[serde(default)]
    pub indicator: IndicatorConfig,
}

/// Appearance of the icon floated above a ghost whose player is in combat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorConfig {
    /// Icon index in the icon atlas (default: 76, a sword)
    #[serde(default = "default_icon_index")]
    pub icon_index: u32,
    /// Width and height of one atlas icon in pixels (default: 32)
    #[serde(default = "default_icon_size")]
    pub icon_size: u32,
    /// Icons per atlas row (default: 16)
    #[serde(default = "default_icons_per_row")]
    pub icons_per_row: u32,
    /// Height above the ghost's feet in pixels (default: 60)
    #[serde(default = "default_float_height")]
    pub float_height: f32,
    /// Bobbing amplitude in pixels (default: 5)
    #[serde(default = "default_bob_amplitude")]
    pub bob_amplitude: f32,
    /// Milliseconds per radian of bobbing phase (default: 200)
    #[serde(default = "default_bob_period_ms")]
    pub bob_period_ms: f32,
}

fn default_sync_interval() -> u32 {
    6
}
fn default_ghost_marker() -> String {
    "RemotePlayer".to_string()
}
fn default_teleport_threshold() -> u32 {
    5
}
fn default_catch_up_distance() -> u32 {
    2
}
fn default_walk_speed() -> u8 {
    4
}
fn default_catch_up_speed() -> u8 {
    5
}
fn default_true() -> bool {
    true
}
fn default_frame_rate() -> u32 {
    60
}

fn default_icon_index() -> u32 {
    76
}
fn default_icon_size() -> u32 {
    32
}
fn default_icons_per_row() -> u32 {
    16
}
fn default_float_height() -> f32 {
    60.0
}
fn default_bob_amplitude() -> f32 {
    5.0
}
fn default_bob_period_ms() -> f32 {
    200.0
}

impl Default for CoopConfig {
    fn default() -> Self {
        Self {
            sync_interval: default_sync_interval(),
            ghost_marker: default_ghost_marker(),
            teleport_threshold: default_teleport_threshold(),
            catch_up_distance: default_catch_up_distance(),
            walk_speed: default_walk_speed(),
            catch_up_speed: default_catch_up_speed(),
            clear_remote_on_close: default_true(),
            frame_rate: default_frame_rate(),
            indicator: IndicatorConfig::default(),
        }
    }
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            icon_index: default_icon_index(),
            icon_size: default_icon_size(),
            icons_per_row: default_icons_per_row(),
            float_height: default_float_height(),
            bob_amplitude: default_bob_amplitude(),
            bob_period_ms: default_bob_period_ms(),
        }
    }
}

impl CoopConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Serialize to a TOML document.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check values the co-op core cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sync_interval == 0 {
            return Err(ConfigError::Invalid("sync_interval must be at least 1".into()));
        }
        if self.ghost_marker.trim().is_empty() {
            return Err(ConfigError::Invalid("ghost_marker must not be empty".into()));
        }
        if self.frame_rate == 0 {
            return Err(ConfigError::Invalid("frame_rate must be at least 1".into()));
        }
        if self.indicator.icons_per_row == 0 {
            return Err(ConfigError::Invalid(
                "indicator.icons_per_row must be at least 1".into(),
            ));
        }
        if self.indicator.bob_period_ms <= 0.0 {
            return Err(ConfigError::Invalid(
                "indicator.bob_period_ms must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Error loading a [`CoopConfig`]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
