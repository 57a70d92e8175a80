//! External system integrations.
//!
//! - [`source`] - the [`EntrySource`] trait the export pipeline is written against
//! - [`labfolder`] - Labfolder REST API v2 implementation
//!
//! # Design Pattern
//!
//! Adapters isolate vendor wire formats from the pipeline. [`connect_source`]
//! picks the implementation named by `source.vendor`, authenticates it once,
//! and hands back a shared trait object.
//!
//! ```rust,no_run
//! use eln_export::adapters::connect_source;
//! use eln_export::config::{secret_string, SourceConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SourceConfig {
//!     base_url: "https://labfolder.labforward.app".to_string(),
//!     token: Some(secret_string("my-token".to_string())),
//!     ..Default::default()
//! };
//!
//! let source = connect_source(config).await?;
//! let first = source.fetch_page(0, 1).await?;
//! println!("{} entries", first.total_count);
//! # Ok(())
//! # }
//! ```

pub mod labfolder;
pub mod source;

pub use labfolder::LabfolderSource;
pub use source::{EntryPage, EntrySource};

use crate::config::SourceConfig;
use crate::domain::{ElnError, Result};
use std::sync::Arc;

/// Create and authenticate the entry source named by `config.vendor`
///
/// # Errors
///
/// Returns a configuration error for an unsupported vendor, or the vendor's
/// authentication error.
pub async fn connect_source(config: SourceConfig) -> Result<Arc<dyn EntrySource>> {
    let vendor = config.vendor.to_lowercase();

    match vendor.as_str() {
        "labfolder" => {
            let mut source = LabfolderSource::new(config)?;
            source.authenticate().await?;
            tracing::info!(base_url = source.base_url(), "Connected to Labfolder");
            Ok(Arc::new(source))
        }
        _ => Err(ElnError::Configuration(format!(
            "Unsupported source vendor: {vendor}. Supported vendors: labfolder"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_source_with_unsupported_vendor() {
        let config = SourceConfig {
            vendor: "benchling".to_string(),
            ..Default::default()
        };

        match connect_source(config).await {
            Err(ElnError::Configuration(msg)) => {
                assert!(msg.contains("Unsupported source vendor"))
            }
            _ => panic!("Expected Configuration error"),
        }
    }
}
