//! Error types for Lumen.
//!
//! Errors are organized by layer: configuration, adapter invocation, and a
//! top-level type that wraps both for library entry points.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for Lumen operations.
#[derive(Error, Debug)]
pub enum LumenError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Adapter invocation errors
    #[error("Adapter error: {0}")]
    Adapter(#[from] AdapterError),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Errors produced while invoking a model adapter or preparing its inputs.
#[derive(Error, Debug)]
pub enum AdapterError {
    /// The adapter's model call failed
    #[error("Invocation failed: {message}")]
    Invocation {
        message: String,
        /// HTTP status code when the failure came from an HTTP backend
        status_code: Option<u16>,
    },

    /// The invocation did not complete within the deadline
    #[error("Invocation timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// All retry attempts were consumed without a success
    #[error("Retry budget exhausted after {attempts} attempts: {last_error}")]
    RetryExhausted { attempts: u32, last_error: String },

    /// Task and image sequences have different lengths
    #[error("Shape mismatch: {tasks} tasks but {images} images")]
    ShapeMismatch { tasks: usize, images: usize },

    /// A batch item failed; identifies the input index for fail-fast callers
    #[error("Invocation {index} failed: {source}")]
    Item {
        index: usize,
        #[source]
        source: Box<AdapterError>,
    },

    /// Loading or decoding a local image failed
    #[error("Image error for {path}: {message}")]
    Image { path: PathBuf, message: String },

    /// Fetching a remote image failed
    #[error("Fetch error for {url}: {message}")]
    Fetch { url: String, message: String },

    /// The blocking facade could not set up its runtime
    #[error("Runtime error: {0}")]
    Runtime(String),
}

/// Convenience type alias for Lumen results.
pub type Result<T> = std::result::Result<T, LumenError>;

/// Convenience type alias for adapter-layer results.
pub type AdapterResult<T> = std::result::Result<T, AdapterError>;
