//! Restricted-mode resolution.
//!
//! Restricted mode blocks commands that touch endpoints or upload files.
//! Whether a run is restricted is resolved through a chain:
//!
//! 1. `--restricted`: explicit per-invocation switch
//! 2. `TASKCMD_RESTRICTED` env var: process/session level
//! 3. `restricted` in `~/.taskcmd/config.toml`: global default
//!
//! With none of those set, runs are unrestricted.

use std::env;

use crate::config::Config;
use crate::convert::convert_to_bool;

/// Environment variable consulted when `--restricted` is not given.
pub const RESTRICTED_ENV: &str = "TASKCMD_RESTRICTED";

/// Resolve restricted mode from the flag, the environment, and config.
pub fn resolve_restricted(flag: bool, config: &Config) -> bool {
    resolve_with(flag, env::var(RESTRICTED_ENV).ok().as_deref(), config)
}

fn resolve_with(flag: bool, env_value: Option<&str>, config: &Config) -> bool {
    // 1. --restricted can only tighten.
    if flag {
        return true;
    }

    // 2. TASKCMD_RESTRICTED, ignoring empty values.
    if let Some(value) = env_value
        && !value.is_empty()
    {
        return convert_to_bool(Some(value), false);
    }

    // 3. config file.
    config.restricted.unwrap_or(false)
}
