//! Init command implementation
//!
//! Writes a starter `eln-export.toml`.

use crate::cli::DEFAULT_CONFIG_PATH;
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing ELN Export configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        match fs::write(&self.output, Self::generate_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your server", self.output);
                println!("  2. Put LABFOLDER_USERNAME and LABFOLDER_PASSWORD (or LABFOLDER_TOKEN) in .env");
                println!("  3. Validate configuration: eln-export validate-config");
                println!("  4. Run export: eln-export export");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }

    fn generate_config() -> String {
        r#"# ELN Export configuration
#
# Values may reference environment variables as ${VAR}. LABFOLDER_SERVER,
# LABFOLDER_USERNAME, LABFOLDER_PASSWORD and LABFOLDER_TOKEN, as well as
# ELN_<SECTION>_<KEY> variables, override this file.

[application]
# trace, debug, info, warn, error
log_level = "info"

[source]
vendor = "labfolder"
base_url = "https://labfolder.labforward.app"
# username = "${LABFOLDER_USERNAME}"
# password = "${LABFOLDER_PASSWORD}"
# token = "${LABFOLDER_TOKEN}"
timeout_seconds = 60

# Entries per listing request (1-1000)
chunk_size = 100

# Listing requests in flight (1-32)
parallel_chunks = 1

[source.retry]
max_retries = 3
initial_delay_ms = 1000
max_delay_ms = 30000
backoff_multiplier = 2.0

[export]
# The export-<timestamp> folder is created here
out_dir = "."

# Authors exported concurrently (1-32)
parallel_authors = 1

# Write create-projects.py and create-links.sql
emit_scripts = true

# Keep the fetched listing as entries.json
save_entries = false

[logging]
local_enabled = false
local_path = "./logs"
# daily, hourly, never
local_rotation = "daily"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;

    #[test]
    fn test_generated_config_parses() {
        let config = parse_config(&InitArgs::generate_config()).unwrap();
        assert_eq!(config.source.vendor, "labfolder");
        assert_eq!(config.source.chunk_size, 100);
        assert!(config.export.emit_scripts);
    }

    #[tokio::test]
    async fn test_init_refuses_to_overwrite() {
        let dir = tempfile::TempDir::new().unwrap();
        let output = dir.path().join("eln-export.toml");
        std::fs::write(&output, "").unwrap();

        let args = InitArgs {
            output: output.display().to_string(),
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), 2);

        let args = InitArgs {
            output: output.display().to_string(),
            force: true,
        };
        assert_eq!(args.execute().await.unwrap(), 0);
        assert!(std::fs::read_to_string(&output).unwrap().contains("[source]"));
    }
}
