//! User configuration for the `st` application.

use crate::{
    constants::ST_CFG_FILE_NAME,
    errors::{StError, StResult},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The user configuration, persisted at `~/.st.toml`.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct StConfig {
    /// Configuration for the `tidy` subcommand.
    pub tidy: TidyConfig,
}

/// Configuration for the `tidy` subcommand.
#[derive(Default, Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TidyConfig {
    /// Abort instead of treating a branch as stale when its ref cannot be checked.
    pub strict_ref_check: bool,
}

impl StConfig {
    /// Loads the configuration from the user's home directory. A missing file yields the defaults.
    pub fn load() -> StResult<Self> {
        Self::load_from(&cfg_path()?)
    }

    /// Loads the configuration from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> StResult<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file found, using defaults");
            return Ok(Self::default());
        }

        Ok(toml::from_str(&std::fs::read_to_string(path)?)?)
    }
}

/// Returns the path to the user configuration file.
pub fn cfg_path() -> StResult<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(ST_CFG_FILE_NAME))
        .ok_or(StError::NoHomeDir)
}
