//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::IsaLinkConfig;
use crate::domain::errors::IsaLinkError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into IsaLinkConfig
/// 4. Applies environment variable overrides (ISALINK_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use isalink::config::loader::load_config;
///
/// let config = load_config("isalink.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<IsaLinkConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(IsaLinkError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        IsaLinkError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Loads configuration, falling back to defaults when the file is absent
///
/// Environment overrides still apply to the defaults.
///
/// # Errors
///
/// Returns an error if the file exists but is invalid.
pub fn load_config_or_default(path: impl AsRef<Path>) -> Result<IsaLinkConfig> {
    let path = path.as_ref();
    if path.exists() {
        return load_config(path);
    }

    tracing::debug!(path = %path.display(), "Configuration file not found, using defaults");
    let mut config = IsaLinkConfig::default();
    apply_env_overrides(&mut config);
    config.validate().map_err(|e| {
        IsaLinkError::Configuration(format!("Configuration validation failed: {e}"))
    })?;
    Ok(config)
}

/// Parses configuration text
///
/// # Errors
///
/// Returns an error if substitution, parsing or validation fails.
pub fn parse_config(contents: &str) -> Result<IsaLinkConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: IsaLinkConfig = toml::from_str(&contents)
        .map_err(|e| IsaLinkError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        IsaLinkError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied untouched.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| IsaLinkError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(IsaLinkError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using ISALINK_* prefix
///
/// Environment variables follow the pattern: ISALINK_<SECTION>_<KEY>
/// For example: ISALINK_REPOSITORY_ROOT, ISALINK_EXPORT_FORMAT
fn apply_env_overrides(config: &mut IsaLinkConfig) {
    // Application overrides
    if let Ok(val) = std::env::var("ISALINK_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("ISALINK_APPLICATION_DRY_RUN") {
        config.application.dry_run = val.parse().unwrap_or(false);
    }

    // Repository overrides
    if let Ok(val) = std::env::var("ISALINK_REPOSITORY_ROOT") {
        config.repository.root = PathBuf::from(val);
    }
    if let Ok(val) = std::env::var("ISALINK_REPOSITORY_CATALOG_FILE") {
        config.repository.catalog_file = val;
    }

    // Import overrides
    if let Ok(val) = std::env::var("ISALINK_IMPORT_NAMESPACE_PREFIX") {
        config.import.namespace_prefix = val;
    }
    if let Ok(val) = std::env::var("ISALINK_IMPORT_VALUE_SEPARATOR") {
        config.import.value_separator = val;
    }

    // Export overrides
    if let Ok(val) = std::env::var("ISALINK_EXPORT_FORMAT") {
        config.export.format = val;
    }
    if let Ok(val) = std::env::var("ISALINK_EXPORT_ARTIFACT_NAMESPACE") {
        config.export.artifact_namespace = val;
    }
    if let Ok(val) = std::env::var("ISALINK_EXPORT_FALLBACK_FILE_NAME") {
        config.export.fallback_file_name = val;
    }

    // Logging overrides
    if let Ok(val) = std::env::var("ISALINK_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("ISALINK_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("ISALINK_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("ISALINK_TEST_ROOT_DIR", "/srv/repo");
        let input = "root = \"${ISALINK_TEST_ROOT_DIR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "root = \"/srv/repo\"\n");
        std::env::remove_var("ISALINK_TEST_ROOT_DIR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("ISALINK_TEST_MISSING_VAR");
        let input = "root = \"${ISALINK_TEST_MISSING_VAR}\"";
        let result = substitute_env_vars(input);
        assert!(result.is_err());
    }

    #[test]
    fn test_substitute_env_vars_skips_comments() {
        std::env::remove_var("ISALINK_TEST_COMMENTED");
        let input = "# root = \"${ISALINK_TEST_COMMENTED}\"";
        let result = substitute_env_vars(input).unwrap();
        assert!(result.contains("${ISALINK_TEST_COMMENTED}"));
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[application]
log_level = "debug"

[repository]
root = "/data/omero-export"

[export]
format = "xlsx"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.application.log_level, "debug");
        assert_eq!(config.repository.root, PathBuf::from("/data/omero-export"));
        assert_eq!(config.export.format, "xlsx");
        assert_eq!(config.import.namespace_prefix, "ARC:ISA");
    }

    #[test]
    fn test_parse_config_rejects_invalid_values() {
        let result = parse_config("[export]\nformat = \"pdf\"\n");
        assert!(matches!(result, Err(IsaLinkError::Configuration(_))));
    }
}
