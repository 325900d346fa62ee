//! Crate-level error type.
//!
//! Almost every operation in this crate is infallible toward the caller:
//! degenerate graphs yield neutral results, non-converging iterations yield
//! the last iterate, and backend failures are logged and dropped at the
//! trigger boundary. What remains fallible is configuration handling, which
//! is what [`SonifierError`] covers.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SonifierError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
