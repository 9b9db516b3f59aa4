//! Bootstrap configuration and root folder resolution
//!
//! Bootstrap settings come from, in priority order:
//! 1. Command-line argument (handled by the caller, passed in as an override)
//! 2. Environment variable (`BSND_ROOT_FOLDER`, then `BSND_ROOT`)
//! 3. TOML config file (`~/.config/bsnd/<module>.toml`)
//! 4. OS-dependent compiled default
//!
//! A missing or unreadable TOML file never stops startup. The problem is
//! logged and compiled defaults are used instead.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Primary root folder environment variable
pub const ROOT_FOLDER_ENV: &str = "BSND_ROOT_FOLDER";

/// Alternate root folder environment variable
pub const ROOT_ENV: &str = "BSND_ROOT";

/// Database file name inside the root folder
pub const DATABASE_FILE_NAME: &str = "bsnd.db";

/// Default port of the selection engine service
pub const DEFAULT_PORT: u16 = 5741;

/// Built-in defaults used when nothing else is configured
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub root_folder: PathBuf,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
    pub port: u16,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        Self {
            root_folder: default_root_folder(),
            log_level: default_log_level(),
            log_file: None,
            port: DEFAULT_PORT,
        }
    }
}

/// Bootstrap configuration loaded from TOML
///
/// Cannot change while running. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    #[serde(default)]
    pub port: Option<u16>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }

    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load the config for a module, falling back to defaults on any problem
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            debug!("No config directory on this platform, using defaults");
            return Self::default();
        };

        if !path.exists() {
            debug!("Config file {} not found, using defaults", path.display());
            return Self::default();
        }

        match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("{}; using defaults", e);
                Self::default()
            }
        }
    }
}

/// Location of a module's TOML config file
pub fn config_file_path(module_name: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("bsnd").join(format!("{}.toml", module_name)))
}

/// Resolves the root folder following the bootstrap priority order
#[derive(Debug, Clone)]
pub struct RootFolderResolver {
    module_name: String,
    config_path: Option<PathBuf>,
}

impl RootFolderResolver {
    pub fn new(module_name: &str) -> Self {
        Self {
            module_name: module_name.to_string(),
            config_path: config_file_path(module_name),
        }
    }

    /// Read the TOML layer from an explicit file instead of the platform location
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    /// Resolve without a command-line override
    pub fn resolve(&self) -> PathBuf {
        self.resolve_with(None)
    }

    /// Resolve, giving `cli_arg` the highest priority
    pub fn resolve_with(&self, cli_arg: Option<&Path>) -> PathBuf {
        if let Some(path) = cli_arg {
            return path.to_path_buf();
        }

        for var in [ROOT_FOLDER_ENV, ROOT_ENV] {
            if let Ok(path) = std::env::var(var) {
                if !path.is_empty() {
                    return PathBuf::from(path);
                }
            }
        }

        let toml = TomlConfig::load_or_default(self.config_path.as_deref());
        if let Some(root_folder) = toml.root_folder {
            return root_folder;
        }

        default_root_folder()
    }
}

/// Prepares the resolved root folder for use
#[derive(Debug, Clone)]
pub struct RootFolderInitializer {
    root_folder: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root_folder: PathBuf) -> Self {
        Self { root_folder }
    }

    pub fn root_folder(&self) -> &Path {
        &self.root_folder
    }

    /// Create the root folder if missing (idempotent)
    pub fn ensure_directory_exists(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root_folder)?;
        Ok(())
    }

    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join(DATABASE_FILE_NAME)
    }

    pub fn database_exists(&self) -> bool {
        self.database_path().exists()
    }
}

/// Get OS-dependent default root folder path
pub fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/bsnd (or /var/lib/bsnd for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("bsnd"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/bsnd"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("bsnd"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/bsnd"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("bsnd"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\bsnd"))
    } else {
        PathBuf::from("./bsnd_data")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_level() {
        assert_eq!(default_log_level(), "info");
        assert_eq!(LoggingConfig::default().level, "info");
    }

    #[test]
    fn test_toml_all_fields() {
        let config = TomlConfig::from_toml_str(
            r#"
            root_folder = "/srv/bsnd"
            port = 6000

            [logging]
            level = "debug"
            file = "/var/log/bsnd.log"
            "#,
        )
        .unwrap();

        assert_eq!(config.root_folder, Some(PathBuf::from("/srv/bsnd")));
        assert_eq!(config.port, Some(6000));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.file, Some(PathBuf::from("/var/log/bsnd.log")));
    }

    #[test]
    fn test_toml_empty_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert!(config.root_folder.is_none());
        assert!(config.port.is_none());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_or_default_missing_path() {
        let config = TomlConfig::load_or_default(None);
        assert!(config.root_folder.is_none());
    }
}
