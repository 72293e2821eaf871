//! Configuration parsing and management for Kagami

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, KagamiError};
use crate::retarget::expression::ManualSliders;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tracking: TrackingConfig,
    pub render: RenderConfig,
    pub rig: RigConfig,
    pub sliders: ManualSliders,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tracking: TrackingConfig::default(),
            render: RenderConfig::default(),
            rig: RigConfig::default(),
            sliders: ManualSliders::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, KagamiError> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::ReadFile(format!("{}: {}", path.as_ref().display(), e))
        })?;

        Self::from_toml(&contents)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(s: &str) -> Result<Self, KagamiError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()).into())
    }

    /// Load configuration from default paths
    pub fn load() -> Result<Self, KagamiError> {
        let paths = [
            PathBuf::from("kagami.toml"),
            PathBuf::from("config/default.toml"),
        ];

        for path in &paths {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), KagamiError> {
        if self.tracking.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "tracking.port".to_string(),
                message: "Port must be greater than 0".to_string(),
            }
            .into());
        }

        if self.render.tick_hz == 0 || self.render.tick_hz > 240 {
            return Err(ConfigError::InvalidValue {
                field: "render.tick_hz".to_string(),
                message: "Tick rate must be between 1 and 240".to_string(),
            }
            .into());
        }

        for (name, value) in self.sliders.named_values() {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidValue {
                    field: format!("sliders.{}", name),
                    message: "Slider values must be between 0.0 and 1.0".to_string(),
                }
                .into());
            }
        }

        Ok(())
    }
}

/// Solver-feed configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Enable the solver receiver
    pub enabled: bool,
    /// UDP listen address
    pub listen_address: String,
    /// UDP listen port for solver datagrams
    pub port: u16,
    /// Swap detected left/right hands (camera mirror correction)
    pub mirror: bool,
    /// Start the tracking session automatically once the rig is loaded
    pub auto_start: bool,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            listen_address: "127.0.0.1".to_string(),
            port: 39541,
            mirror: true,
            auto_start: true,
        }
    }
}

/// Render-tick configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Retargeting tick rate in Hz
    pub tick_hz: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { tick_hz: 60 }
    }
}

/// Rig configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RigConfig {
    /// Bone profile for the in-memory rig: "full" or "upper-body"
    pub profile: String,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            profile: "full".to_string(),
        }
    }
}
