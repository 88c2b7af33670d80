//! Error types for nextver-core.

use thiserror::Error;

/// Errors that can occur when loading the versioning configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file exists but could not be deserialized.
    #[error("invalid versioning config: {0}")]
    Deserialize(#[from] Box<figment::Error>),

    /// No configuration file was found under the repository root.
    #[error("no versioning config found")]
    NotFound,
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;
