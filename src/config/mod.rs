//! Configuration management for the exporter.
//!
//! TOML configuration with:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `LABFOLDER_*` and `ELN_*` environment overrides
//! - Default values for every setting, so a file is optional
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use eln_export::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("eln-export.toml")?;
//! println!("Source: {} ({})", config.source.base_url, config.source.vendor);
//! println!("Chunk size: {}", config.source.chunk_size);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - log level
//! - [`SourceConfig`] - vendor, URL, credentials, chunking, [`RetryConfig`]
//! - [`ExportConfig`] - output directory, author parallelism, scripts
//! - [`LoggingConfig`] - optional JSON file logging
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [source]
//! vendor = "labfolder"
//! base_url = "https://labfolder.labforward.app"
//! username = "ada@example.org"
//! password = "${LABFOLDER_PASSWORD}"
//! chunk_size = 100
//!
//! [export]
//! out_dir = "./exports"
//! parallel_authors = 2
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, load_config_from_env, parse_config};
pub use schema::{
    ApplicationConfig, ElnConfig, ExportConfig, LoggingConfig, RetryConfig, SourceConfig,
};
pub use secret::{secret_string, secret_string_opt, SecretString, SecretValue};
