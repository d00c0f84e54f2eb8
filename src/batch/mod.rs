//! Concurrent batch invocation over model adapters.
//!
//! Provides the bounded worker-pool runner plus the retry policy (error
//! classification and exponential backoff) it composes with.

pub(crate) mod retry;
pub(crate) mod runner;

pub use retry::{backoff_duration, is_retryable};
pub use runner::{BatchOptions, BatchRunner};
