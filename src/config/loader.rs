//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::ElnConfig;
use super::secret::secret_string;
use crate::domain::errors::ElnError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into ElnConfig
/// 4. Applies environment variable overrides (LABFOLDER_* then ELN_*)
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
/// use eln_export::config::loader::load_config;
///
/// let config = load_config("eln-export.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ElnConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ElnError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        ElnError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Builds the configuration from built-in defaults and the environment only
///
/// Used when no configuration file exists: the exporter is then driven by
/// `LABFOLDER_*` and `ELN_*` variables alone.
pub fn load_config_from_env() -> Result<ElnConfig> {
    let mut config = ElnConfig::default();
    apply_env_overrides(&mut config)?;
    config.validate().map_err(|e| {
        ElnError::Configuration(format!("Configuration validation failed: {e}"))
    })?;
    Ok(config)
}

/// Parses, overrides and validates configuration text
pub fn parse_config(contents: &str) -> Result<ElnConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: ElnConfig = toml::from_str(&contents)
        .map_err(|e| ElnError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        ElnError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| ElnError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        // Placeholders in comments are left alone
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
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
        lines.push(processed_line);
    }

    if !missing_vars.is_empty() {
        return Err(ElnError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

/// `LABFOLDER_SERVER` is conventionally a bare host name; https is assumed.
fn server_url(server: &str) -> String {
    let server = server.trim().trim_end_matches('/');
    if server.starts_with("http://") || server.starts_with("https://") {
        server.to_string()
    } else {
        format!("https://{server}")
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match std::env::var(name) {
        Ok(val) => val.trim().parse().map(Some).map_err(|_| {
            ElnError::Configuration(format!("Invalid value for {name}: {val}"))
        }),
        Err(_) => Ok(None),
    }
}

/// Applies environment variable overrides
///
/// The vendor's own variables (`LABFOLDER_SERVER`, `LABFOLDER_USERNAME`,
/// `LABFOLDER_PASSWORD`, `LABFOLDER_TOKEN`) are applied first, then the
/// `ELN_<SECTION>_<KEY>` variables, so the latter win when both are set.
fn apply_env_overrides(config: &mut ElnConfig) -> Result<()> {
    // Vendor variables
    if let Ok(val) = std::env::var("LABFOLDER_SERVER") {
        config.source.base_url = server_url(&val);
    }
    if let Ok(val) = std::env::var("LABFOLDER_USERNAME") {
        config.source.username = Some(val);
    }
    if let Ok(val) = std::env::var("LABFOLDER_PASSWORD") {
        config.source.password = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("LABFOLDER_TOKEN") {
        config.source.token = Some(secret_string(val));
    }

    // Application overrides
    if let Ok(val) = std::env::var("ELN_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Source overrides
    if let Ok(val) = std::env::var("ELN_SOURCE_VENDOR") {
        config.source.vendor = val;
    }
    if let Ok(val) = std::env::var("ELN_SOURCE_BASE_URL") {
        config.source.base_url = val;
    }
    if let Ok(val) = std::env::var("ELN_SOURCE_USERNAME") {
        config.source.username = Some(val);
    }
    if let Ok(val) = std::env::var("ELN_SOURCE_PASSWORD") {
        config.source.password = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("ELN_SOURCE_TOKEN") {
        config.source.token = Some(secret_string(val));
    }
    if let Some(val) = parse_env("ELN_SOURCE_TIMEOUT_SECONDS")? {
        config.source.timeout_seconds = val;
    }
    if let Some(val) = parse_env("ELN_SOURCE_CHUNK_SIZE")? {
        config.source.chunk_size = val;
    }
    if let Some(val) = parse_env("ELN_SOURCE_PARALLEL_CHUNKS")? {
        config.source.parallel_chunks = val;
    }
    if let Some(val) = parse_env("ELN_SOURCE_RETRY_MAX_RETRIES")? {
        config.source.retry.max_retries = val;
    }

    // Export overrides
    if let Ok(val) = std::env::var("ELN_EXPORT_OUT_DIR") {
        config.export.out_dir = val;
    }
    if let Some(val) = parse_env("ELN_EXPORT_PARALLEL_AUTHORS")? {
        config.export.parallel_authors = val;
    }
    if let Some(val) = parse_env("ELN_EXPORT_EMIT_SCRIPTS")? {
        config.export.emit_scripts = val;
    }
    if let Some(val) = parse_env("ELN_EXPORT_SAVE_ENTRIES")? {
        config.export.save_entries = val;
    }

    // Logging overrides
    if let Some(val) = parse_env("ELN_LOGGING_LOCAL_ENABLED")? {
        config.logging.local_enabled = val;
    }
    if let Ok(val) = std::env::var("ELN_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("ELN_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    // Tests that touch process environment must not interleave
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn test_substitute_env_vars() {
        let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        std::env::set_var("ELN_LOADER_TEST_VAR", "test_value");
        let input = "password = \"${ELN_LOADER_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "password = \"test_value\"");
        std::env::remove_var("ELN_LOADER_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        std::env::remove_var("ELN_LOADER_MISSING_VAR");
        let input = "password = \"${ELN_LOADER_MISSING_VAR}\"";
        let err = substitute_env_vars(input).unwrap_err();
        assert!(err.to_string().contains("ELN_LOADER_MISSING_VAR"));
    }

    #[test]
    fn test_substitute_env_vars_skips_comments() {
        let input = "# token = \"${ELN_LOADER_COMMENTED_OUT}\"\nchunk_size = 10";
        let result = substitute_env_vars(input).unwrap();
        assert!(result.contains("${ELN_LOADER_COMMENTED_OUT}"));
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent-eln-export.toml");
        assert!(matches!(result, Err(ElnError::Configuration(_))));
    }

    #[test]
    fn test_load_config_valid() {
        let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let toml_content = r#"
[application]
log_level = "debug"

[source]
vendor = "labfolder"
base_url = "https://lab.example.com"
username = "ada@example.org"
chunk_size = 25

[source.retry]
max_retries = 2

[export]
out_dir = "/tmp/exports"
parallel_authors = 2
emit_scripts = false
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.application.log_level, "debug");
        assert_eq!(config.source.chunk_size, 25);
        assert_eq!(config.source.retry.max_retries, 2);
        assert_eq!(config.export.parallel_authors, 2);
        assert!(!config.export.emit_scripts);
    }

    #[test]
    fn test_parse_config_rejects_invalid_values() {
        let result = parse_config("[source]\nchunk_size = 5000\n");
        let err = result.unwrap_err();
        assert!(err.to_string().contains("chunk_size"));
    }

    #[test]
    fn test_server_url_assumes_https() {
        assert_eq!(server_url("labfolder.labforward.app"), "https://labfolder.labforward.app");
        assert_eq!(server_url("http://localhost:8080/"), "http://localhost:8080");
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        std::env::set_var("ELN_LOADER_TEST_NUMBER", "many");
        let result = parse_env::<usize>("ELN_LOADER_TEST_NUMBER");
        std::env::remove_var("ELN_LOADER_TEST_NUMBER");
        assert!(result.is_err());
    }
}
