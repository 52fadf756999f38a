//! taskcmd configuration.
//!
//! Loaded from `~/.taskcmd/config.toml`. Every key is optional and a missing
//! file means defaults.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// taskcmd configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// Restrict runs to commands marked safe for untrusted tasks.
    /// Overridden by `--restricted` and `TASKCMD_RESTRICTED`.
    pub restricted: Option<bool>,

    /// Fail writes to read-only variables instead of warning.
    #[serde(default)]
    pub read_only_variables: bool,
}

impl Config {
    /// Load config from `~/.taskcmd/config.toml`, or defaults if absent.
    pub fn load() -> Result<Self, String> {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load config from `path`, or defaults if the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let contents = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(format!("failed to read {}: {e}", path.display())),
        };

        toml::from_str(&contents).map_err(|e| format!("invalid config at {}: {e}", path.display()))
    }

    /// The config file path: `~/.taskcmd/config.toml`.
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".taskcmd").join("config.toml"))
    }
}
