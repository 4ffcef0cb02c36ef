//! Engine Configuration Module
//!
//! Tunables for the zone-intersection engine, loaded from TOML.
//!
//! ## Loading Order
//!
//! 1. `LATERAL_ZONES_CONFIG` environment variable (path to TOML file)
//! 2. `zone_config.toml` in the current working directory
//! 3. Built-in defaults
//!
//! ## Usage
//!
//! Library entry points take `&EngineConfig` explicitly. Binaries call
//! `config::init()` once at startup and `config::get()` afterwards:
//!
//! ```ignore
//! config::init(EngineConfig::load());
//! let max_inc = config::get().lateral.max_inclination_deg;
//! ```

mod engine_config;
pub mod validation;

pub use engine_config::*;

use std::sync::OnceLock;

/// Global engine configuration, initialized once at startup.
static ENGINE_CONFIG: OnceLock<EngineConfig> = OnceLock::new();

/// Initialize the global engine configuration.
///
/// Later calls are ignored with a warning.
pub fn init(config: EngineConfig) {
    if ENGINE_CONFIG.set(config).is_err() {
        tracing::warn!("config::init() called more than once, ignoring");
    }
}

/// Get a reference to the global engine configuration.
///
/// Panics if `init()` has not been called: a missing config is a startup bug.
pub fn get() -> &'static EngineConfig {
    ENGINE_CONFIG
        .get()
        .expect("config::get() called before config::init()")
}

/// Check whether the config has been initialized.
pub fn is_initialized() -> bool {
    ENGINE_CONFIG.get().is_some()
}
