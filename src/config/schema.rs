//! Configuration schema types
//!
//! Every section has defaults, so an empty file is a valid configuration.

use crate::core::export::coordinator::{DEFAULT_ARTIFACT_NAMESPACE, DEFAULT_FALLBACK_FILE_NAME};
use crate::core::export::serializer::TableFormat;
use crate::core::import::builder::DEFAULT_VALUE_SEPARATOR;
use crate::domain::DEFAULT_NAMESPACE_PREFIX;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Main isalink configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IsaLinkConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Repository location
    #[serde(default)]
    pub repository: RepositoryConfig,

    /// Import settings
    #[serde(default)]
    pub import: ImportConfig,

    /// Export settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl IsaLinkConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.repository.validate()?;
        self.import.validate()?;
        self.export.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Dry run mode (parse and resolve, but never write)
    #[serde(default)]
    pub dry_run: bool,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
        }
    }
}

/// Local repository configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// Directory holding the catalog and file artifacts
    #[serde(default = "default_repository_root")]
    pub root: PathBuf,

    /// Catalog file name, relative to `root`
    #[serde(default = "default_catalog_file")]
    pub catalog_file: String,
}

impl RepositoryConfig {
    /// Full path of the catalog file
    pub fn catalog_path(&self) -> PathBuf {
        self.root.join(&self.catalog_file)
    }

    fn validate(&self) -> Result<(), String> {
        if self.root.as_os_str().is_empty() {
            return Err("repository.root cannot be empty".to_string());
        }
        if self.catalog_file.trim().is_empty() {
            return Err("repository.catalog_file cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            root: default_repository_root(),
            catalog_file: default_catalog_file(),
        }
    }
}

/// Import (spreadsheet → annotations) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Prefix of every namespace key
    #[serde(default = "default_namespace_prefix")]
    pub namespace_prefix: String,

    /// Separator placed between positional values of a row
    #[serde(default = "default_value_separator")]
    pub value_separator: String,
}

impl ImportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.namespace_prefix.trim().is_empty() {
            return Err("import.namespace_prefix cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            namespace_prefix: default_namespace_prefix(),
            value_separator: default_value_separator(),
        }
    }
}

/// Export (images → table) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Output format (csv or xlsx)
    #[serde(default = "default_export_format")]
    pub format: String,

    /// Namespace of the uploaded artifact
    #[serde(default = "default_artifact_namespace")]
    pub artifact_namespace: String,

    /// Base file name used when no entity name applies
    #[serde(default = "default_fallback_file_name")]
    pub fallback_file_name: String,
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        TableFormat::from_str(&self.format).map_err(|e| e.to_string())?;
        if self.fallback_file_name.trim().is_empty() {
            return Err("export.fallback_file_name cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: default_export_format(),
            artifact_namespace: default_artifact_namespace(),
            fallback_file_name: default_fallback_file_name(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path is required when local_enabled = true".to_string());
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_repository_root() -> PathBuf {
    PathBuf::from("./repository")
}

fn default_catalog_file() -> String {
    "catalog.json".to_string()
}

fn default_namespace_prefix() -> String {
    DEFAULT_NAMESPACE_PREFIX.to_string()
}

fn default_value_separator() -> String {
    DEFAULT_VALUE_SEPARATOR.to_string()
}

fn default_export_format() -> String {
    "csv".to_string()
}

fn default_artifact_namespace() -> String {
    DEFAULT_ARTIFACT_NAMESPACE.to_string()
}

fn default_fallback_file_name() -> String {
    DEFAULT_FALLBACK_FILE_NAME.to_string()
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
