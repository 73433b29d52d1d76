//! Error types for price analytics.
//!
//! This module defines [`DropsError`] which covers the structural failures that
//! abort a computation (missing fields) and the failures of the collaborators
//! that fetch or parse price tables. Statistical edge cases such as empty
//! series are never errors; they degrade to documented neutral values.

use thiserror::Error;

/// Errors that can occur while loading or analysing price data.
#[derive(Error, Debug)]
pub enum DropsError {
    /// A required field is absent from an input table.
    #[error("Schema error: missing required field '{field}'")]
    Schema {
        /// Name of the missing field.
        field: String,
    },

    /// The requested symbol is unknown to the source or the dataset.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// The source returned no usable observations for the symbol.
    #[error("Data not available for {symbol}: {detail}")]
    DataNotAvailable {
        /// The symbol that was requested.
        symbol: String,
        /// Why no data came back.
        detail: String,
    },

    /// Network-related errors (connection failures, timeouts, etc.).
    #[error("Network error: {0}")]
    Network(String),

    /// Rate limit exceeded by a price source.
    #[error("Rate limited by {provider}: retry after {retry_after:?}")]
    RateLimited {
        /// The source that rate limited the request.
        provider: String,
        /// Suggested time to wait before retrying.
        retry_after: Option<std::time::Duration>,
    },

    /// Error parsing a payload or a field value.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Error raised by the DataFrame layer.
    #[error("Frame error: {0}")]
    Frame(String),

    /// An invalid parameter was provided.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The requested feature is not supported.
    #[error("Feature not supported: {0}")]
    NotSupported(String),

    /// Any other error.
    #[error("{0}")]
    Other(String),
}

impl DropsError {
    /// Creates a schema error for a missing field.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::Schema {
            field: field.into(),
        }
    }

    /// Returns true if this error means the symbol simply has no data.
    ///
    /// Loaders skip such symbols instead of aborting the whole dataset.
    #[must_use]
    pub const fn is_no_data(&self) -> bool {
        matches!(self, Self::SymbolNotFound(_) | Self::DataNotAvailable { .. })
    }
}

/// Result type alias using [`DropsError`].
pub type Result<T> = std::result::Result<T, DropsError>;
