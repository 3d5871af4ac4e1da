//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{DropshareConfig, FileOrder};
use super::secret::secret_string;
use crate::domain::errors::DropshareError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into DropshareConfig
/// 4. Applies environment variable overrides (DROPSHARE_* prefix)
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
/// use dropshare::config::loader::load_config;
///
/// let config = load_config("dropshare.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<DropshareConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(DropshareError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        DropshareError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: DropshareConfig = toml::from_str(&contents)
        .map_err(|e| DropshareError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        DropshareError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied through untouched.
///
/// # Errors
///
/// Returns an error naming every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| DropshareError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars = Vec::new();

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
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(DropshareError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the DROPSHARE_* prefix
///
/// Environment variables follow the pattern DROPSHARE_<SECTION>_<KEY>,
/// for example DROPSHARE_BACKEND_URL or DROPSHARE_SCHEDULE_SLEEP_INTERVAL_MINUTES.
fn apply_env_overrides(config: &mut DropshareConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("DROPSHARE_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Drop share overrides
    if let Ok(val) = std::env::var("DROPSHARE_DROPSHARE_ROOT") {
        config.dropshare.root = PathBuf::from(val);
    }
    if let Ok(val) = std::env::var("DROPSHARE_DROPSHARE_ORDER") {
        config.dropshare.order = match val.as_str() {
            "enumeration" => FileOrder::Enumeration,
            "oldest_first" => FileOrder::OldestFirst,
            other => {
                return Err(DropshareError::Configuration(format!(
                    "Invalid DROPSHARE_DROPSHARE_ORDER '{other}'. Must be one of: enumeration, oldest_first"
                )))
            }
        };
    }

    // Backend overrides
    if let Ok(val) = std::env::var("DROPSHARE_BACKEND_URL") {
        config.backend.url = val;
    }
    if let Ok(val) = std::env::var("DROPSHARE_BACKEND_USERNAME") {
        config.backend.username = Some(val);
    }
    if let Ok(val) = std::env::var("DROPSHARE_BACKEND_PASSWORD") {
        config.backend.password = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("DROPSHARE_BACKEND_TIMEOUT_SECONDS") {
        if let Ok(timeout) = val.parse() {
            config.backend.timeout_seconds = timeout;
        }
    }
    if let Ok(val) = std::env::var("DROPSHARE_BACKEND_MAPPING_TYPES") {
        config.backend.mapping_types = val.parse().unwrap_or(true);
    }
    if let Ok(val) = std::env::var("DROPSHARE_BACKEND_LOG_INDEX") {
        config.backend.log_index = val;
    }

    // Schedule overrides
    if let Ok(val) = std::env::var("DROPSHARE_SCHEDULE_SLEEP_INTERVAL_MINUTES") {
        if let Ok(minutes) = val.parse() {
            config.schedule.sleep_interval_minutes = minutes;
        }
    }

    // Logging overrides
    if let Ok(val) = std::env::var("DROPSHARE_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(true);
    }
    if let Ok(val) = std::env::var("DROPSHARE_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("DROPSHARE_LOADER_TEST_VAR", "test_value");
        let input = "password = \"${DROPSHARE_LOADER_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "password = \"test_value\"\n");
        std::env::remove_var("DROPSHARE_LOADER_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("DROPSHARE_LOADER_MISSING_VAR");
        let input = "password = \"${DROPSHARE_LOADER_MISSING_VAR}\"";
        let result = substitute_env_vars(input);
        assert!(result.is_err());
    }

    #[test]
    fn test_substitute_env_vars_skips_comments() {
        std::env::remove_var("DROPSHARE_LOADER_COMMENTED_VAR");
        let input = "# password = \"${DROPSHARE_LOADER_COMMENTED_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert!(result.contains("${DROPSHARE_LOADER_COMMENTED_VAR}"));
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[dropshare]
root = "/mnt/dropshare"

[backend]
url = "http://search.internal:9200"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.dropshare.root, PathBuf::from("/mnt/dropshare"));
        assert_eq!(config.backend.url, "http://search.internal:9200");
        assert_eq!(config.backend.log_index, "logs");
        assert_eq!(config.schedule.sleep_interval_minutes, 5);
    }
}
