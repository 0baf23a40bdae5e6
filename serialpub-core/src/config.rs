//! Configuration loading
//!
//! # Locations
//!
//! The configuration directory is the first existing one of:
//! 1. `$SERIALPUB_CONFIG_DIR`
//! 2. the platform configuration directory joined with `serialpub`
//!    (`$XDG_CONFIG_HOME/serialpub` on Linux)
//! 3. `~/.serialpub`
//!
//! It holds `config.toml` and, optionally, a `namegen.so` override library.
//!
//! # Example
//!
//! ```toml
//! [namegen]
//! rules = "t:legacy_t|n:fc_rm>p_title>str_filesafe|f:legacy_f"
//! ```
//!
//! `$SERIALPUB_NAMEGEN` takes precedence over `namegen.rules`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::namegen::NameGenerator;

/// Environment variable pointing at the configuration directory
pub const CONFIG_DIR_ENV: &str = "SERIALPUB_CONFIG_DIR";

/// Environment variable overriding `namegen.rules`
pub const NAMEGEN_ENV: &str = "SERIALPUB_NAMEGEN";

pub const CONFIG_FILE: &str = "config.toml";

const APP_DIR: &str = "serialpub";
const HOME_DIR: &str = ".serialpub";

/// Naming settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NamegenConfig {
    /// Rule expression, or absolute path of an override library
    pub rules: Option<String>,
}

/// Contents of `config.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub namegen: NamegenConfig,

    /// Directory the configuration was loaded from
    #[serde(skip)]
    dir: Option<PathBuf>,
}

impl Config {
    /// Load the configuration from the default locations
    ///
    /// A missing file is not an error. `$SERIALPUB_NAMEGEN` is applied on top.
    pub fn load() -> std::result::Result<Self, ConfigError> {
        let explicit = std::env::var_os(CONFIG_DIR_ENV).map(PathBuf::from);
        let dir = config_dir(explicit)?;
        let mut config = Self::load_from(&dir)?;
        if let Ok(rules) = std::env::var(NAMEGEN_ENV) {
            tracing::debug!(rules = %rules, "namegen rules from environment");
            config.namegen.rules = Some(rules);
        }
        Ok(config)
    }

    /// Load `config.toml` from `dir`, falling back to defaults when absent
    pub fn load_from(dir: &Path) -> std::result::Result<Self, ConfigError> {
        let path = dir.join(CONFIG_FILE);
        let mut config = if path.is_file() {
            Self::read(&path)?
        } else {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            Self::default()
        };
        config.dir = Some(dir.to_path_buf());
        Ok(config)
    }

    fn read(path: &Path) -> std::result::Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    pub fn namegen_rules(&self) -> Option<&str> {
        self.namegen.rules.as_deref()
    }

    /// Name generator for this configuration
    pub fn name_generator(&self) -> Result<NameGenerator> {
        NameGenerator::from_option(self.namegen_rules(), self.dir())
    }
}

/// Pick the configuration directory
///
/// `explicit` is the value of `$SERIALPUB_CONFIG_DIR`. When no candidate
/// exists the platform directory is returned, so callers know where to
/// create one.
pub fn config_dir(explicit: Option<PathBuf>) -> std::result::Result<PathBuf, ConfigError> {
    let platform = dirs::config_dir().map(|d| d.join(APP_DIR));
    let home = dirs::home_dir().map(|d| d.join(HOME_DIR));

    let candidates = [explicit, platform.clone(), home.clone()];
    if let Some(dir) = candidates.into_iter().flatten().find(|d| d.is_dir()) {
        return Ok(dir);
    }
    platform.or(home).ok_or(ConfigError::NoConfigDir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(dir.path()).unwrap();
        assert_eq!(config.namegen, NamegenConfig::default());
        assert_eq!(config.dir(), Some(dir.path()));
    }

    #[test]
    fn test_reads_rules() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "[namegen]\nrules = \"t:p_title|n:_t>str_rm_space\"\n",
        )
        .unwrap();
        let config = Config::load_from(dir.path()).unwrap();
        assert_eq!(config.namegen_rules(), Some("t:p_title|n:_t>str_rm_space"));
        assert!(config.name_generator().is_ok());
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "[namegen]\nrulez = \"x\"\n").unwrap();
        assert!(matches!(
            Config::load_from(dir.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_explicit_dir_wins_when_it_exists() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            config_dir(Some(dir.path().to_path_buf())).unwrap(),
            dir.path()
        );
    }

    #[test]
    fn test_missing_explicit_dir_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let chosen = config_dir(Some(missing.clone()));
        if let Ok(chosen) = chosen {
            assert_ne!(chosen, missing);
        }
    }
}
