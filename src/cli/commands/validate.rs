//! Validate config command implementation

use crate::cli::{resolve_config, DEFAULT_CONFIG_PATH};
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: Option<&str>) -> anyhow::Result<i32> {
        let shown = config_path.unwrap_or(DEFAULT_CONFIG_PATH);
        tracing::info!(config_path = %shown, "Validating configuration");

        println!("🔍 Validating configuration: {shown}");
        println!();

        // Loading validates as well
        let config = match resolve_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                println!();
                return Ok(2);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Source Vendor: {}", config.source.vendor);
        println!("  Server: {}", config.source.base_url);
        println!(
            "  Credentials: {}",
            if config.source.has_token() {
                "token"
            } else if config.source.username.is_some() && config.source.password.is_some() {
                "username/password"
            } else {
                "prompted at export time"
            }
        );
        println!("  Chunk Size: {}", config.source.chunk_size);
        println!("  Parallel Chunks: {}", config.source.parallel_chunks);
        println!("  Max Retries: {}", config.source.retry.max_retries);
        println!("  Output Directory: {}", config.export.out_dir);
        println!("  Parallel Authors: {}", config.export.parallel_authors);
        println!("  Migration Scripts: {}", config.export.emit_scripts);
        println!("  File Logging: {}", config.logging.local_enabled);
        println!();
        Ok(0)
    }
}
