// src/core/paths.rs

use crate::constants::{APP_DIR, SESSION_FILENAME, SETTINGS_FILENAME};
use lazy_static::lazy_static;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use thiserror::Error;

lazy_static! {
    static ref APP_CONFIG_DIR: Mutex<Option<PathBuf>> = Mutex::new(None);
}

/// Why a config path could not be resolved.
#[derive(Error, Debug)]
pub enum PathError {
    #[error("Could not find system config directory.")]
    ConfigDirNotFound,
    #[error("Could not create config directory at '{path}': {source}")]
    ConfigDirCreation {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Could not expand path '{template}': {reason}")]
    Expand { template: String, reason: String },
}

/// Returns the path to the itcmd configuration directory (`~/.config/itcmd`).
/// Creates it if it doesn't exist.
///
/// The first call computes and caches the path; later calls reuse it.
pub fn get_app_config_dir() -> Result<PathBuf, PathError> {
    // A poisoned lock only means another thread panicked mid-lookup; the cached value is still usable.
    let mut cached_path_guard = APP_CONFIG_DIR
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    if let Some(path) = &*cached_path_guard {
        return Ok(path.clone());
    }

    let config_path = dirs::config_dir()
        .ok_or(PathError::ConfigDirNotFound)?
        .join(APP_DIR);

    if !config_path.exists() {
        fs::create_dir_all(&config_path).map_err(|e| PathError::ConfigDirCreation {
            path: config_path.display().to_string(),
            source: e,
        })?;
    }

    *cached_path_guard = Some(config_path.clone());
    Ok(config_path)
}

/// Returns the path to `config.toml`.
pub fn get_settings_path() -> Result<PathBuf, PathError> {
    get_app_config_dir().map(|dir| dir.join(SETTINGS_FILENAME))
}

/// Returns the path to `session.json`.
pub fn get_session_path() -> Result<PathBuf, PathError> {
    get_app_config_dir().map(|dir| dir.join(SESSION_FILENAME))
}

/// Expands `~` and environment variables (`$VAR`, `${VAR}`) in a user-supplied path.
pub fn expand_user_path(template: &str) -> Result<PathBuf, PathError> {
    let expanded = shellexpand::full(template).map_err(|e| PathError::Expand {
        template: template.to_string(),
        reason: e.to_string(),
    })?;
    Ok(PathBuf::from(expanded.into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_plain_path_is_unchanged() {
        let path = expand_user_path("/tmp/catalog.toml").unwrap();
        assert_eq!(path, PathBuf::from("/tmp/catalog.toml"));
    }

    #[test]
    fn test_expand_home() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        let path = expand_user_path("~/catalog.toml").unwrap();
        assert_eq!(path, home.join("catalog.toml"));
    }

    #[test]
    fn test_expand_unknown_variable_fails() {
        let result = expand_user_path("$ITCMD_TEST_SURELY_UNSET_VARIABLE/catalog.toml");
        assert!(matches!(result, Err(PathError::Expand { .. })));
    }
}
