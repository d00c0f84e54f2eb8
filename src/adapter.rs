//! Model adapter trait and invocation types.
//!
//! Defines the interface that all multimodal model backends implement. The
//! batch runner is generic over this capability and never depends on a
//! concrete model family.

use crate::error::AdapterError;
use crate::image::ImageInput;
use async_trait::async_trait;
use std::time::Duration;

/// One (task, image) unit of work submitted to a model adapter.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Text prompt for the model
    pub task: String,
    /// Encoded image to send alongside the prompt
    pub image: ImageInput,
}

impl Invocation {
    pub fn new(task: impl Into<String>, image: ImageInput) -> Self {
        Self {
            task: task.into(),
            image,
        }
    }
}

/// The response from a model invocation.
#[derive(Debug, Clone)]
pub struct ModelResponse {
    /// Generated text
    pub text: String,
    /// Model identifier used
    pub model: String,
    /// Number of tokens used (input + output), if reported
    pub tokens_used: Option<u32>,
    /// Round-trip latency in milliseconds
    pub latency_ms: u64,
}

impl ModelResponse {
    /// Generation rate in tokens per second, when the backend reported a
    /// token count. Zero elapsed time yields infinity.
    pub fn tokens_per_second(&self) -> Option<f64> {
        self.tokens_used.map(|tokens| {
            if self.latency_ms == 0 {
                f64::INFINITY
            } else {
                f64::from(tokens) / (self.latency_ms as f64 / 1000.0)
            }
        })
    }
}

/// Trait that all multimodal model adapters implement.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (we need `Arc<dyn ModelAdapter>` for dynamic dispatch across worker tasks).
#[async_trait]
pub trait ModelAdapter: Send + Sync {
    /// Adapter name for logging (e.g., "ollama", "anthropic").
    fn name(&self) -> &str;

    /// Run the model on a single task and image.
    async fn invoke(&self, task: &str, image: &ImageInput) -> Result<ModelResponse, AdapterError>;

    /// Per-invocation deadline for this adapter.
    fn timeout(&self) -> Duration {
        Duration::from_secs(60)
    }
}
