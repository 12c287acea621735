//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! Environment overrides are read through the helpers at the bottom.

use std::str::FromStr;

use crate::error::{EngineError, EngineResult};

/// Default minimum mean severity for a stepping-stone asset
pub const DEFAULT_SEVERITY_THRESHOLD: f64 = 6.3;

/// Default size of the route ranking and the application table
pub const DEFAULT_TOP_K: usize = 10;

/// Weight of one hop along an attack edge
pub const HOP_WEIGHT: f64 = 1.0;

/// Highest severity score accepted from the catalog
pub const MAX_SEVERITY: f64 = 10.0;

/// Catalog size above which the builder switches to the app index
pub const INDEXED_BUILD_CUTOFF: usize = 256;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "attackpath";

// ============================================
// Environment variable names
// ============================================

pub const ENV_TARGET: &str = "ATTACKPATH_TARGET";
pub const ENV_SEVERITY_THRESHOLD: &str = "ATTACKPATH_SEVERITY_THRESHOLD";
pub const ENV_CLUSTER_MODE: &str = "ATTACKPATH_CLUSTER_MODE";
pub const ENV_TOP_K: &str = "ATTACKPATH_TOP_K";
pub const ENV_SEVERITY_GATE: &str = "ATTACKPATH_SEVERITY_GATE";
pub const ENV_DEADLINE_SECS: &str = "ATTACKPATH_DEADLINE_SECS";

// ============================================
// Helper functions to read from env
// ============================================

/// Raw value of an environment variable, `None` when unset or not unicode
pub fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Parse one variable from `lookup`.
///
/// Unset or blank is `Ok(None)`; a value that does not parse is an error
/// naming the variable, never a silent fallback to the default.
pub fn read_var<T, F>(name: &str, lookup: F) -> EngineResult<Option<T>>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(name) else {
        return Ok(None);
    };
    let value = raw.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value.parse().map(Some).map_err(|_| {
        EngineError::InvalidConfig(format!("{} has an invalid value: '{}'", name, value))
    })
}
