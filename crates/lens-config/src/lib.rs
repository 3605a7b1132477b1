//! Application configuration
//!
//! Lens needs no configuration file to run; everything has a default and
//! can be overridden through environment variables:
//!
//! - `LENS_LOG_LEVEL` - trace, debug, info, warn, error (default: info)
//! - `LOG_FORMAT` - json or pretty (default: pretty)
//! - `LENS_STALENESS_WINDOW_SECS` - freshness window for the workspace
//!   cache's filesystem scan (default: 5)

pub mod logging;

use serde::{Deserialize, Serialize};

/// Log output format
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
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

/// Workspace-cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    /// Seconds a cached solution handle is trusted without a filesystem scan
    pub staleness_window_secs: u64,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            staleness_window_secs: 5,
        }
    }
}

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub workspace: WorkspaceConfig,
}

impl AppConfig {
    /// Build the configuration from defaults plus environment overrides.
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Ok(level) = std::env::var("LENS_LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Ok(format) = std::env::var("LOG_FORMAT") {
            match format.to_lowercase().as_str() {
                "json" => config.logging.format = LogFormat::Json,
                "pretty" | "human" => config.logging.format = LogFormat::Pretty,
                _ => {}
            }
        }
        if let Some(secs) = std::env::var("LENS_STALENESS_WINDOW_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.workspace.staleness_window_secs = secs;
        }

        config
    }
}
