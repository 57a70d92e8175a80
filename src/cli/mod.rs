//! CLI interface and argument parsing

pub mod commands;

use crate::config::{load_config, load_config_from_env, ElnConfig};
use crate::domain::Result;
use clap::{Parser, Subcommand};
use std::path::Path;

/// Configuration file looked up when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "eln-export.toml";

/// ELN Export - notebook entries to per-author .eln archives
#[derive(Parser, Debug)]
#[command(name = "eln-export")]
#[command(version, about, long_about = None)]
#[command(author = "ELN Export Contributors")]
pub struct Cli {
    /// Path to configuration file [default: eln-export.toml, if present]
    #[arg(short, long, env = "ELN_CONFIG")]
    pub config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "ELN_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export every notebook entry into per-author .eln archives
    Export(commands::export::ExportArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

/// Load the configuration the CLI runs with
///
/// An explicit path must exist. Without one, `eln-export.toml` is used when
/// present; otherwise the configuration comes from defaults and the
/// environment alone.
pub fn resolve_config(path: Option<&str>) -> Result<ElnConfig> {
    match path {
        Some(path) => load_config(path),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => load_config(DEFAULT_CONFIG_PATH),
        None => {
            tracing::debug!("No configuration file, using defaults and environment");
            load_config_from_env()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_export() {
        let cli = Cli::parse_from(["eln-export", "export"]);
        assert!(cli.config.is_none());
        assert!(matches!(cli.command, Commands::Export(_)));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["eln-export", "--config", "custom.toml", "export"]);
        assert_eq!(cli.config.as_deref(), Some("custom.toml"));
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["eln-export", "--log-level", "debug", "export"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_export_flags() {
        let cli = Cli::parse_from([
            "eln-export",
            "export",
            "--out-dir",
            "/tmp/out",
            "--entries-file",
            "entries.json",
            "--save-entries",
            "--parallel-authors",
            "4",
            "--no-scripts",
        ]);

        let Commands::Export(args) = cli.command else {
            panic!("expected export");
        };
        assert_eq!(args.out_dir.as_deref(), Some("/tmp/out"));
        assert_eq!(args.entries_file.as_deref(), Some("entries.json"));
        assert!(args.save_entries);
        assert_eq!(args.parallel_authors, Some(4));
        assert!(args.no_scripts);
        assert!(!args.quiet);
    }

    #[test]
    fn test_cli_parse_export_quiet() {
        let cli = Cli::parse_from(["eln-export", "export", "-q"]);
        let Commands::Export(args) = cli.command else {
            panic!("expected export");
        };
        assert!(args.quiet);
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["eln-export", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["eln-export", "init", "--force"]);
        assert!(matches!(cli.command, Commands::Init(ref a) if a.force));
    }

    #[test]
    fn test_explicit_missing_config_is_an_error() {
        assert!(resolve_config(Some("definitely-missing-eln.toml")).is_err());
    }
}
