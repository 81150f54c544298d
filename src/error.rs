//! Error types for the match analytics service
//!
//! This module defines all error types using anyhow for consistent error handling
//! throughout the application.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific match analytics scenarios
#[derive(Debug, thiserror::Error)]
pub enum MatchAnalyticsError {
    #[error("Malformed event metadata: '{key}' must be an integer identifier, got {value}")]
    MalformedMetadata { key: String, value: String },

    #[error("Storage operation failed: {message}")]
    StorageFailure { message: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },
}

impl MatchAnalyticsError {
    /// Whether the error was caused by the caller's input rather than the service
    pub fn is_client_error(&self) -> bool {
        matches!(self, MatchAnalyticsError::MalformedMetadata { .. })
    }
}
