//! Configuration schema types
//!
//! This module defines the configuration structure for the exporter.

use crate::config::SecretString;
use serde::{Deserialize, Serialize};

/// Notebook vendors with an entry source implementation
pub const SUPPORTED_VENDORS: &[&str] = &["labfolder"];

/// Main exporter configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ElnConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Notebook source configuration
    #[serde(default)]
    pub source: SourceConfig,

    /// Export settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ElnConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.source.validate()?;
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
        }
    }
}

/// Retry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per request
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Backoff multiplier
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

impl RetryConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_retries == 0 || self.max_retries > 10 {
            return Err(format!(
                "source.retry.max_retries must be between 1 and 10, got {}",
                self.max_retries
            ));
        }

        if self.backoff_multiplier < 1.0 {
            return Err(format!(
                "source.retry.backoff_multiplier must be >= 1.0, got {}",
                self.backoff_multiplier
            ));
        }

        if self.initial_delay_ms > self.max_delay_ms {
            return Err(format!(
                "source.retry.initial_delay_ms ({}) cannot exceed max_delay_ms ({})",
                self.initial_delay_ms, self.max_delay_ms
            ));
        }

        Ok(())
    }

    /// Delay before the given retry attempt (1-based), capped at `max_delay_ms`
    pub fn delay_for_attempt(&self, attempt: usize) -> u64 {
        let factor = self
            .backoff_multiplier
            .powi(attempt.saturating_sub(1) as i32);
        let delay = (self.initial_delay_ms as f64 * factor) as u64;
        delay.min(self.max_delay_ms)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

/// Notebook source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Vendor implementation (e.g., "labfolder")
    #[serde(default = "default_vendor")]
    pub vendor: String,

    /// Base URL of the notebook server, without the `/api/v2` suffix
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Account user name (prompted for when absent and no token is set)
    #[serde(default)]
    pub username: Option<String>,

    /// Account password
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub password: Option<SecretString>,

    /// Pre-issued bearer token; skips the login call
    #[serde(default)]
    pub token: Option<SecretString>,

    /// Timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Entries requested per listing chunk
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Listing chunks fetched concurrently
    #[serde(default = "default_parallelism")]
    pub parallel_chunks: usize,

    /// Retry configuration
    #[serde(default)]
    pub retry: RetryConfig,
}

impl SourceConfig {
    fn validate(&self) -> Result<(), String> {
        let vendor = self.vendor.to_lowercase();
        if !SUPPORTED_VENDORS.contains(&vendor.as_str()) {
            return Err(format!(
                "Invalid source.vendor '{}'. Must be one of: {}",
                self.vendor,
                SUPPORTED_VENDORS.join(", ")
            ));
        }

        if self.base_url.is_empty() {
            return Err("source.base_url cannot be empty".to_string());
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err("source.base_url must start with http:// or https://".to_string());
        }

        if url::Url::parse(&self.base_url).is_err() {
            return Err(format!("source.base_url is not a valid URL: {}", self.base_url));
        }

        if !(1..=1000).contains(&self.chunk_size) {
            return Err(format!(
                "source.chunk_size must be between 1 and 1000, got {}",
                self.chunk_size
            ));
        }

        if self.parallel_chunks == 0 || self.parallel_chunks > 32 {
            return Err(format!(
                "source.parallel_chunks must be between 1 and 32, got {}",
                self.parallel_chunks
            ));
        }

        if self.timeout_seconds == 0 {
            return Err("source.timeout_seconds must be > 0".to_string());
        }

        self.retry.validate()?;
        Ok(())
    }

    /// Whether a bearer token is configured
    pub fn has_token(&self) -> bool {
        use secrecy::ExposeSecret;

        self.token
            .as_ref()
            .map(|t| !t.expose_secret().is_empty())
            .unwrap_or(false)
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            vendor: default_vendor(),
            base_url: default_base_url(),
            username: None,
            password: None,
            token: None,
            timeout_seconds: default_timeout_seconds(),
            chunk_size: default_chunk_size(),
            parallel_chunks: default_parallelism(),
            retry: RetryConfig::default(),
        }
    }
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory the timestamped export folder is created in
    #[serde(default = "default_out_dir")]
    pub out_dir: String,

    /// Author pipelines run concurrently
    #[serde(default = "default_parallelism")]
    pub parallel_authors: usize,

    /// Write `create-projects.py` and `create-links.sql`
    #[serde(default = "default_true")]
    pub emit_scripts: bool,

    /// Write the fetched listing to `entries.json`
    #[serde(default)]
    pub save_entries: bool,
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.out_dir.trim().is_empty() {
            return Err("export.out_dir cannot be empty".to_string());
        }

        if self.parallel_authors == 0 || self.parallel_authors > 32 {
            return Err(format!(
                "export.parallel_authors must be between 1 and 32, got {}",
                self.parallel_authors
            ));
        }

        Ok(())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            out_dir: default_out_dir(),
            parallel_authors: default_parallelism(),
            emit_scripts: true,
            save_entries: false,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log file directory
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
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
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

fn default_vendor() -> String {
    "labfolder".to_string()
}

fn default_base_url() -> String {
    "https://labfolder.labforward.app".to_string()
}

fn default_true() -> bool {
    true
}

fn default_timeout_seconds() -> u64 {
    60
}

fn default_chunk_size() -> usize {
    100
}

fn default_parallelism() -> usize {
    1
}

fn default_max_retries() -> usize {
    3
}

fn default_initial_delay_ms() -> u64 {
    1000
}

fn default_max_delay_ms() -> u64 {
    30000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_out_dir() -> String {
    ".".to_string()
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;

    #[test]
    fn test_application_config_validation() {
        let mut config = ApplicationConfig {
            log_level: "info".to_string(),
        };

        assert!(config.validate().is_ok());

        config.log_level = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = ElnConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.source.chunk_size, 100);
        assert_eq!(config.source.vendor, "labfolder");
        assert!(config.export.emit_scripts);
        assert!(!config.export.save_entries);
    }

    #[test]
    fn test_source_config_validation() {
        let mut config = SourceConfig::default();
        assert!(config.validate().is_ok());

        config.vendor = "elabftw".to_string();
        assert!(config.validate().unwrap_err().contains("source.vendor"));

        config.vendor = "Labfolder".to_string();
        assert!(config.validate().is_ok());

        config.base_url = "ftp://labfolder.example.com".to_string();
        assert!(config.validate().is_err());

        config.base_url = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_chunk_size_bounds() {
        let mut config = SourceConfig::default();

        config.chunk_size = 0;
        assert!(config.validate().is_err());

        config.chunk_size = 1;
        assert!(config.validate().is_ok());

        config.chunk_size = 1000;
        assert!(config.validate().is_ok());

        config.chunk_size = 1001;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parallelism_bounds() {
        let mut source = SourceConfig::default();
        source.parallel_chunks = 0;
        assert!(source.validate().is_err());

        let mut export = ExportConfig::default();
        export.parallel_authors = 33;
        assert!(export.validate().is_err());

        export.parallel_authors = 4;
        assert!(export.validate().is_ok());
    }

    #[test]
    fn test_retry_config_validation() {
        let mut retry = RetryConfig::default();
        assert!(retry.validate().is_ok());

        retry.max_retries = 0;
        assert!(retry.validate().is_err());

        retry.max_retries = 3;
        retry.backoff_multiplier = 0.5;
        assert!(retry.validate().is_err());

        retry.backoff_multiplier = 2.0;
        retry.initial_delay_ms = 60_000;
        assert!(retry.validate().is_err());
    }

    #[test]
    fn test_retry_delay_grows_and_caps() {
        let retry = RetryConfig {
            max_retries: 5,
            initial_delay_ms: 100,
            max_delay_ms: 350,
            backoff_multiplier: 2.0,
        };

        assert_eq!(retry.delay_for_attempt(1), 100);
        assert_eq!(retry.delay_for_attempt(2), 200);
        assert_eq!(retry.delay_for_attempt(3), 350);
    }

    #[test]
    fn test_has_token() {
        let mut config = SourceConfig::default();
        assert!(!config.has_token());

        config.token = Some(secret_string(String::new()));
        assert!(!config.has_token());

        config.token = Some(secret_string("abc".to_string()));
        assert!(config.has_token());
    }

    #[test]
    fn test_logging_config_validation() {
        let mut config = LoggingConfig::default();
        assert!(config.validate().is_ok());

        config.local_rotation = "weekly".to_string();
        assert!(config.validate().is_err());

        config.local_rotation = "hourly".to_string();
        config.local_enabled = true;
        config.local_path = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_deserializes_with_sections_missing() {
        let config: ElnConfig = toml::from_str(
            r#"
[source]
base_url = "https://lab.example.com"
chunk_size = 50
"#,
        )
        .unwrap();

        assert_eq!(config.source.base_url, "https://lab.example.com");
        assert_eq!(config.source.chunk_size, 50);
        assert_eq!(config.source.retry.max_retries, 3);
        assert_eq!(config.export.parallel_authors, 1);
        assert_eq!(config.application.log_level, "info");
    }
}
