//! Engine configuration management.
//!
//! This module provides configuration loading, the global verbose flag,
//! and the engine defaults consumed by the estimators and conversions.

mod defaults;

#[cfg(test)]
mod tests;

pub use defaults::EngineDefaults;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Once, OnceLock};

use serde::Deserialize;

use crate::error::{Result, WbError};

// Global verbose flag for controlling progress output
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set the global verbose flag. When true, progress messages will be printed.
pub fn set_verbose(verbose: bool) {
    VERBOSE.store(verbose, Ordering::SeqCst);
}

/// Check if verbose mode is enabled.
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

/// Print a message to stderr only if verbose mode is enabled.
#[macro_export]
macro_rules! verbose_println {
    ($($arg:tt)*) => {
        if $crate::config::is_verbose() {
            eprintln!($($arg)*);
        }
    };
}

const CONFIG_FILENAME: &str = "whitepoint.yml";
const CONFIG_ENV: &str = "WHITEPOINT_CONFIG";

/// Loaded configuration, its source path, and warnings.
pub struct EngineConfigHandle {
    pub config: EngineConfig,
    pub source: Option<PathBuf>,
    pub warnings: Vec<String>,
}

impl EngineConfigHandle {
    fn with_config(config: EngineConfig, source: Option<PathBuf>, warnings: Vec<String>) -> Self {
        Self {
            config,
            source,
            warnings,
        }
    }
}

/// Complete configuration file structure.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    pub defaults: EngineDefaults,
}

impl EngineConfig {
    /// Parse and sanitize a YAML document.
    ///
    /// Out-of-range values are pulled into range; the returned notes say
    /// which ones were adjusted beyond clamping.
    pub fn from_yaml_str(contents: &str) -> Result<(Self, Vec<String>)> {
        let mut config: EngineConfig =
            serde_yaml::from_str(contents).map_err(|err| WbError::Config(err.to_string()))?;
        let notes = config.defaults.sanitize();
        Ok((config, notes))
    }
}

/// Load configuration from disk, optionally forcing a specific path.
pub fn load_engine_config(custom_path: Option<&Path>) -> EngineConfigHandle {
    let mut warnings = Vec::new();

    for candidate in config_candidates(custom_path) {
        if !candidate.is_file() {
            continue;
        }

        match fs::read_to_string(&candidate) {
            Ok(contents) => match EngineConfig::from_yaml_str(&contents) {
                Ok((config, notes)) => {
                    warnings.extend(notes);
                    let source = fs::canonicalize(&candidate).unwrap_or(candidate);
                    return EngineConfigHandle::with_config(config, Some(source), warnings);
                }
                Err(err) => warnings.push(format!(
                    "Failed to parse config {}: {}",
                    candidate.display(),
                    err
                )),
            },
            Err(err) => warnings.push(format!(
                "Failed to read config {}: {}",
                candidate.display(),
                err
            )),
        }
    }

    EngineConfigHandle::with_config(EngineConfig::default(), None, warnings)
}

/// Candidate config paths in lookup order.
fn config_candidates(custom_path: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(path) = custom_path {
        candidates.push(path.to_path_buf());
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        candidates.push(PathBuf::from(env_path));
    }

    if let Ok(cwd) = std::env::current_dir() {
        candidates.push(cwd.join("config").join(CONFIG_FILENAME));
        candidates.push(cwd.join(CONFIG_FILENAME));
    }

    if let Some(home_dir) = dirs::home_dir() {
        candidates.push(home_dir.join("whitepoint").join(CONFIG_FILENAME));
    }

    candidates
}

static ENGINE_CONFIG_HANDLE: OnceLock<EngineConfigHandle> = OnceLock::new();
static LOG_CONFIG_ONCE: Once = Once::new();

/// Install the process-wide configuration from `path` (first call wins).
///
/// Later calls and [`engine_config_handle`] return the handle already loaded.
pub fn init_engine_config(path: Option<&Path>) -> &'static EngineConfigHandle {
    ENGINE_CONFIG_HANDLE.get_or_init(|| load_engine_config(path))
}

/// Access the global engine configuration (loaded once per process).
pub fn engine_config_handle() -> &'static EngineConfigHandle {
    init_engine_config(None)
}

/// Log the config source and warnings the first time it is requested.
pub fn log_config_usage() {
    LOG_CONFIG_ONCE.call_once(|| {
        let handle = engine_config_handle();
        match &handle.source {
            Some(source) => log::debug!("loaded config from {}", source.display()),
            None => log::debug!("using built-in defaults"),
        }
        for warning in &handle.warnings {
            log::warn!("config: {}", warning);
        }
    });
}
