//! Lumen - Multimodal model adapter abstraction with concurrent batch invocation.
//!
//! Lumen defines a thin capability trait for multimodal (text + image) model
//! backends and a batch runner that fans invocations out to a bounded worker
//! pool, with per-item retry, per-invocation timeouts, and input-order
//! results.
//!
//! # Architecture
//!
//! ```text
//! (task, image) pairs → BatchRunner (worker pool, retry, timeout) → ordered results
//!                              │
//!                              └── dyn ModelAdapter (opaque model call)
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use lumen::{BatchOptions, BatchRunner, ImageInput, Invocation};
//!
//! #[tokio::main]
//! async fn main() -> lumen::Result<()> {
//!     let adapter = my_backend(); // Box<dyn ModelAdapter>
//!     let runner = BatchRunner::new(adapter, BatchOptions::default());
//!
//!     let image = ImageInput::from_path("./photo.jpg").await?;
//!     let batch = vec![Invocation::new("Describe this image", image)];
//!     let results = runner.run_batch(&batch).await?;
//!     println!("{}", results[0].text);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod adapter;
pub mod batch;
pub mod config;
pub mod error;
pub mod history;
pub mod image;

// Re-exports for convenient access
pub use adapter::{Invocation, ModelAdapter, ModelResponse};
pub use batch::{BatchOptions, BatchRunner};
pub use config::{BatchConfig, Config, GenerationConfig};
pub use error::{AdapterError, AdapterResult, ConfigError, LumenError, Result};
pub use history::ChatHistory;
pub use image::{ImageFetcher, ImageInput, ImageSource};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_default_config_matches_runner_defaults() {
        let config = Config::default();
        let options = BatchOptions::default();
        assert_eq!(config.batch.max_workers, options.max_workers);
        assert_eq!(config.batch.retry_attempts, options.retry_attempts);
    }
}
