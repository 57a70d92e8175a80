//! Result type alias for the exporter
//!
//! This module provides a convenient Result type alias that uses `ElnError`
//! as the error type.

use super::errors::ElnError;

/// Result type alias for exporter operations
///
/// # Examples
///
/// ```
/// use eln_export::domain::result::Result;
/// use eln_export::domain::errors::ElnError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(ElnError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, ElnError>;
