//! # User settings
//!
//! `config.toml` in the app config dir. A default file is written on first
//! run so users can discover the available keys.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::{
    constants::CATALOG_ENV_VAR,
    core::paths::{self, PathError},
    models::Settings,
};
use log::debug;
use thiserror::Error;

/// Why the settings file could not be read or written.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Filesystem Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed settings file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Path error: {0}")]
    Path(#[from] PathError),
}

/// Loads `config.toml` from the app config dir, creating it with defaults if missing.
pub fn load_settings() -> Result<Settings, SettingsError> {
    load_settings_from(&paths::get_settings_path()?)
}

/// Loads settings from `path`, creating the file with defaults if missing.
pub fn load_settings_from(path: &Path) -> Result<Settings, SettingsError> {
    if !path.exists() {
        debug!("Writing default settings to '{}'", path.display());
        let default_settings = Settings::default();
        let toml_string = toml::to_string_pretty(&default_settings)?;
        fs::write(path, toml_string)?;
        Ok(default_settings)
    } else {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}

/// The external catalog to load, if any. `ITCMD_CATALOG` wins over the settings file.
pub fn catalog_path(settings: &Settings) -> Result<Option<PathBuf>, SettingsError> {
    let from_env = env::var(CATALOG_ENV_VAR).ok().filter(|v| !v.trim().is_empty());
    let template = from_env.or_else(|| settings.catalog.clone());

    match template {
        Some(t) => Ok(Some(paths::expand_user_path(&t)?)),
        None => Ok(None),
    }
}
