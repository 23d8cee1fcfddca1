// TOML config adapter - Configuration management using TOML files

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::adapters::tracing_log::LogFormat;
use crate::domain::model::EngineCapabilities;
use crate::error::ConfigError;
use crate::planner::BitratePolicy;

/// Default config locations, first existing wins
pub const DEFAULT_CONFIG_PATHS: [&str; 2] = ["clipplan.toml", "config/clipplan.toml"];

/// Logging section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Complete configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipPlanConfig {
    pub policy: BitratePolicy,
    pub capabilities: EngineCapabilities,
    pub logging: LoggingConfig,
}

impl ClipPlanConfig {
    /// Check values the planner cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.policy.overhead_margin_bp >= 10_000 {
            return Err(ConfigError::Invalid {
                field: "policy.overhead_margin_bp".to_string(),
                reason: format!("{} must be below 10000", self.policy.overhead_margin_bp),
            });
        }
        if self.policy.min_video_bps == 0 {
            return Err(ConfigError::Invalid {
                field: "policy.min_video_bps".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        if !(self.policy.default_target_size_mb.is_finite() && self.policy.default_target_size_mb > 0.0) {
            return Err(ConfigError::Invalid {
                field: "policy.default_target_size_mb".to_string(),
                reason: format!("{} is not a positive size", self.policy.default_target_size_mb),
            });
        }
        if self.policy.default_audio_kbps == 0 || self.policy.fallback_audio_kbps == 0 {
            return Err(ConfigError::Invalid {
                field: "policy.audio".to_string(),
                reason: "audio bitrates must be greater than zero".to_string(),
            });
        }
        if let Some(encoder) = self
            .capabilities
            .hardware_encoders
            .iter()
            .find(|e| !e.is_hardware())
        {
            return Err(ConfigError::Invalid {
                field: "capabilities.hardware_encoders".to_string(),
                reason: format!("{} is a software encoder", encoder),
            });
        }
        Ok(())
    }
}

/// TOML configuration adapter
#[derive(Debug, Default)]
pub struct TomlConfigAdapter {
    config_file_path: Option<PathBuf>,
}

impl TomlConfigAdapter {
    /// Create new TOML config adapter
    pub fn new() -> Self {
        Self::default()
    }

    /// Path the last successful load read from
    pub fn config_file_path(&self) -> Option<&Path> {
        self.config_file_path.as_deref()
    }

    /// Deserialize config from TOML string
    pub fn parse_str(&self, toml_content: &str) -> Result<ClipPlanConfig, ConfigError> {
        let config: ClipPlanConfig = toml::from_str(toml_content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn load_config(&mut self, path: &Path) -> Result<ClipPlanConfig, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config = self.parse_str(&content)?;
        info!("Loaded configuration from: {}", path.display());
        self.config_file_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Load the explicit file, else the first default path under `base`, else defaults
    pub fn load_or_default(
        &mut self,
        explicit: Option<&Path>,
        base: &Path,
    ) -> Result<ClipPlanConfig, ConfigError> {
        if let Some(path) = explicit {
            return self.load_config(path);
        }

        for candidate in DEFAULT_CONFIG_PATHS {
            let path = base.join(candidate);
            if path.is_file() {
                return self.load_config(&path);
            }
        }

        debug!("No configuration file found, using defaults");
        Ok(ClipPlanConfig::default())
    }
}
