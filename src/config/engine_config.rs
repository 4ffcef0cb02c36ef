//! Engine Configuration - zone-intersection tunables as TOML values
//!
//! Each struct implements `Default` with the values the engine is specified
//! with, so running without a config file gives the reference behaviour.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "LATERAL_ZONES_CONFIG";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "zone_config.toml";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for the zone-intersection engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Lateral window selection
    #[serde(default)]
    pub lateral: LateralConfig,

    /// Crossing detector behaviour
    #[serde(default)]
    pub crossing: CrossingConfig,

    /// Percentage aggregation checks
    #[serde(default)]
    pub aggregation: AggregationConfig,

    /// Master table merge behaviour
    #[serde(default)]
    pub merge: MergeConfig,

    /// Batch execution
    #[serde(default)]
    pub batch: BatchConfig,
}

impl EngineConfig {
    /// Load configuration using the standard search order:
    /// 1. `$LATERAL_ZONES_CONFIG`
    /// 2. `./zone_config.toml`
    /// 3. Built-in defaults
    pub fn load() -> Self {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded engine config from {}", CONFIG_ENV_VAR);
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load engine config, falling back");
                    }
                }
            } else {
                warn!(path = %path, "{} points to non-existent file, falling back", CONFIG_ENV_VAR);
            }
        }

        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded engine config from ./{}", LOCAL_CONFIG_FILE);
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./{}, using defaults", LOCAL_CONFIG_FILE);
                }
            }
        }

        info!("No {} found, using built-in defaults", LOCAL_CONFIG_FILE);
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::ParseStr(inner) => ConfigError::Parse(path.to_path_buf(), inner),
            other => other,
        })
    }

    /// Parse and validate a TOML document. Unknown keys are logged, not rejected.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        for w in super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self = toml::from_str(contents).map_err(ConfigError::ParseStr)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Validate all values, collecting every violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();

        let max_inc = self.lateral.max_inclination_deg;
        if !max_inc.is_finite() || max_inc <= 0.0 || max_inc > 180.0 {
            errors.push(format!(
                "lateral.max_inclination_deg = {max_inc} must be in (0, 180]"
            ));
        }

        let tol = self.aggregation.sum_tolerance_percent;
        if !tol.is_finite() || tol <= 0.0 {
            errors.push(format!(
                "aggregation.sum_tolerance_percent = {tol} must be a finite value > 0"
            ));
        }

        if let Some(threads) = self.batch.worker_threads {
            if threads == 0 {
                errors.push("batch.worker_threads must be > 0 when set".to_string());
            }
            if !self.batch.parallel {
                warn!("batch.worker_threads is set but batch.parallel = false; threads are unused");
            }
        }

        for w in super::validation::plausibility_warnings(self) {
            warn!("{}", w);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config I/O error ({}): {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config parse error ({}): {}", .0.display(), .1)]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("Config parse error: {0}")]
    ParseStr(#[source] toml::de::Error),

    #[error("Config serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Config validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
}

// ============================================================================
// Lateral Window
// ============================================================================

/// Lateral section selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LateralConfig {
    /// Stations with inclination strictly below this value (degrees) are
    /// part of the lateral. With elevation-signed TVD a vertical downward
    /// section reads 180 and a flat section 90.
    #[serde(default = "default_max_inclination")]
    pub max_inclination_deg: f64,
}

fn default_max_inclination() -> f64 { 91.0 }

impl Default for LateralConfig {
    fn default() -> Self {
        Self {
            max_inclination_deg: default_max_inclination(),
        }
    }
}

// ============================================================================
// Crossing Detector
// ============================================================================

/// Zone crossing detector behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossingConfig {
    /// Keep zero-length intervals produced when the well touches a horizon
    /// exactly at a station. When false they are folded into the next interval.
    #[serde(default)]
    pub keep_zero_length_intervals: bool,

    /// Snap the display azimuth to the nearest quarter turn before rotating.
    #[serde(default = "default_snap_display_angle")]
    pub snap_display_angle: bool,
}

fn default_snap_display_angle() -> bool { true }

impl Default for CrossingConfig {
    fn default() -> Self {
        Self {
            keep_zero_length_intervals: false,
            snap_display_angle: default_snap_display_angle(),
        }
    }
}

// ============================================================================
// Aggregation
// ============================================================================

/// Percentage aggregation checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationConfig {
    /// Allowed deviation of a well's percentage sum from 100.
    #[serde(default = "default_sum_tolerance")]
    pub sum_tolerance_percent: f64,
}

fn default_sum_tolerance() -> f64 { 1e-6 }

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            sum_tolerance_percent: default_sum_tolerance(),
        }
    }
}

// ============================================================================
// Merge
// ============================================================================

/// Master table merge behaviour.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MergeConfig {
    /// Remove master interval rows for a merged (well, zone-set) whose key was
    /// not produced by the current run. Off by default: plain upsert.
    #[serde(default)]
    pub prune_stale_intervals: bool,
}

// ============================================================================
// Batch
// ============================================================================

/// Batch execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Compute wells in parallel.
    #[serde(default = "default_parallel")]
    pub parallel: bool,

    /// Size of a dedicated worker pool. Unset uses the global rayon pool.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_threads: Option<usize>,
}

fn default_parallel() -> bool { true }

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            parallel: default_parallel(),
            worker_threads: None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok(), "Default config must always validate");
    }

    #[test]
    fn test_empty_toml_produces_defaults() {
        let config: EngineConfig = toml::from_str("").expect("empty TOML should parse");
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.lateral.max_inclination_deg, 91.0);
        assert!(config.crossing.snap_display_angle);
        assert!(!config.merge.prune_stale_intervals);
        assert!(config.batch.parallel);
    }

    #[test]
    fn test_partial_toml_override() {
        let toml_str = r#"
[lateral]
max_inclination_deg = 92.5

[batch]
worker_threads = 4
"#;
        let config = EngineConfig::from_toml_str(toml_str).expect("partial TOML should parse");
        assert_eq!(config.lateral.max_inclination_deg, 92.5);
        assert_eq!(config.batch.worker_threads, Some(4));
        // Non-overridden values retain defaults
        assert!(config.batch.parallel);
        assert_eq!(config.aggregation.sum_tolerance_percent, 1e-6);
    }

    #[test]
    fn test_validation_catches_bad_inclination() {
        let mut config = EngineConfig::default();
        config.lateral.max_inclination_deg = 0.0;
        let result = config.validate();
        match result {
            Err(ConfigError::Validation(errors)) => {
                assert!(errors.iter().any(|e| e.contains("max_inclination_deg")));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_validation_collects_every_error() {
        let mut config = EngineConfig::default();
        config.lateral.max_inclination_deg = f64::NAN;
        config.aggregation.sum_tolerance_percent = -1.0;
        config.batch.worker_threads = Some(0);
        match config.validate() {
            Err(ConfigError::Validation(errors)) => assert_eq!(errors.len(), 3),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_roundtrip_toml() {
        let mut original = EngineConfig::default();
        original.merge.prune_stale_intervals = true;
        let toml_str = original.to_toml().expect("serialization should work");
        assert!(toml_str.contains("[lateral]"));
        assert!(toml_str.contains("[merge]"));
        let roundtripped: EngineConfig = toml::from_str(&toml_str).expect("deserialization should work");
        assert_eq!(original, roundtripped);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zone_config.toml");
        std::fs::write(&path, "[crossing]\nkeep_zero_length_intervals = true\n").unwrap();
        let config = EngineConfig::load_from_file(&path).unwrap();
        assert!(config.crossing.keep_zero_length_intervals);
    }

    #[test]
    fn test_load_from_file_reports_path_on_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[lateral\nmax_inclination_deg = 1").unwrap();
        match EngineConfig::load_from_file(&path) {
            Err(ConfigError::Parse(p, _)) => assert_eq!(p, path),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_string_parse_error_has_no_empty_path() {
        let err = EngineConfig::from_toml_str("[lateral\nmax_inclination_deg = 1").unwrap_err();
        assert!(matches!(err, ConfigError::ParseStr(_)));
        let message = err.to_string();
        assert!(message.starts_with("Config parse error: "), "{message}");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = EngineConfig::load_from_file(Path::new("/definitely/not/here.toml"));
        assert!(matches!(result, Err(ConfigError::Io(..))));
    }
}
