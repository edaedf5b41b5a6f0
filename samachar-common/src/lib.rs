//! Common types and utilities shared across Samachar crates.
//!
//! This crate holds the shared error type and the tracing initialiser used by
//! every binary and integration test in the workspace. It stays small so the
//! other crates can depend on it without pulling in the HTTP or terminal stack.
//!
//! # Overview
//!
//! - [`observability`]: Centralised tracing/logging initialisation
//! - [`SamacharError`] and [`Result`]: Shared error handling
//!
//! # Examples
//!
//! ```rust
//! use samachar_common::SamacharError;
//!
//! let err = SamacharError::Config("missing base_url".into());
//! assert_eq!(err.to_string(), "Configuration error: missing base_url");
//! ```

pub mod observability;

/// Error types used across the Samachar client.
#[derive(thiserror::Error, Debug)]
pub enum SamacharError {
    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The classification service could not be used.
    #[error("Service error: {0}")]
    Service(String),

    /// The terminal could not be prepared or restored.
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    /// Operation exceeded the configured timeout.
    #[error("Timeout occurred")]
    Timeout,
}

/// Convenient alias for results that use [`SamacharError`].
pub type Result<T> = std::result::Result<T, SamacharError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_convert_into_terminal_variant() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "no tty");
        let err: SamacharError = io.into();
        assert!(matches!(err, SamacharError::Terminal(_)));
        assert_eq!(err.to_string(), "Terminal error: no tty");
    }
}
