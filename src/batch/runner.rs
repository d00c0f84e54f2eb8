//! Concurrent batch execution over a model adapter.
//!
//! The runner fans (task, image) invocations out to a bounded worker pool
//! (semaphore-gated tokio tasks), optionally with per-item retry, and always
//! returns results in input order regardless of completion order.

use super::retry;
use crate::adapter::{Invocation, ModelAdapter, ModelResponse};
use crate::config::{BatchConfig, Config};
use crate::error::{AdapterError, AdapterResult};
use crate::history::ChatHistory;
use crate::image::ImageInput;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

/// Configuration for the batch runner.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Maximum concurrent invocations
    pub max_workers: usize,
    /// Per-invocation timeout in milliseconds
    pub invoke_timeout_ms: u64,
    /// Total attempts per invocation when retrying (initial call included)
    pub retry_attempts: u32,
    /// Base backoff delay in milliseconds
    pub retry_delay_ms: u64,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            max_workers: 10,
            invoke_timeout_ms: 60_000,
            retry_attempts: 3,
            retry_delay_ms: 1000,
        }
    }
}

impl From<&BatchConfig> for BatchOptions {
    fn from(config: &BatchConfig) -> Self {
        Self {
            max_workers: config.max_workers,
            invoke_timeout_ms: config.invoke_timeout_ms,
            retry_attempts: config.retry_attempts,
            retry_delay_ms: config.retry_delay_ms,
        }
    }
}

/// Concurrent batch runner over an opaque model adapter.
///
/// The worker pool is sized once at construction and reused across calls.
/// Each invocation moves through Pending → Running → Succeeded/Failed; a
/// failed invocation with retry budget remaining goes back to Running.
pub struct BatchRunner {
    adapter: Arc<dyn ModelAdapter>,
    options: BatchOptions,
    pool: Arc<Semaphore>,
    history: ChatHistory,
}

impl BatchRunner {
    pub fn new(adapter: Box<dyn ModelAdapter>, options: BatchOptions) -> Self {
        let pool = Arc::new(Semaphore::new(options.max_workers));
        Self {
            adapter: Arc::from(adapter),
            options,
            pool,
            history: ChatHistory::new(),
        }
    }

    /// Build a runner from the `[batch]` section of a loaded config.
    pub fn from_config(adapter: Box<dyn ModelAdapter>, config: &Config) -> Self {
        Self::new(adapter, BatchOptions::from(&config.batch))
    }

    /// The session's chat history (records prompts and responses from
    /// `run_many`).
    pub fn history(&self) -> &ChatHistory {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut ChatHistory {
        &mut self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Run the adapter over parallel task and image sequences.
    ///
    /// Requires `tasks.len() == images.len()`; a mismatch is rejected before
    /// any work is submitted. Each completed result is logged and recorded in
    /// the chat history, and the full ordered result list is returned.
    pub async fn run_many(
        &mut self,
        tasks: &[String],
        images: &[ImageInput],
    ) -> AdapterResult<Vec<ModelResponse>> {
        if tasks.len() != images.len() {
            return Err(AdapterError::ShapeMismatch {
                tasks: tasks.len(),
                images: images.len(),
            });
        }

        let invocations: Vec<Invocation> = tasks
            .iter()
            .zip(images)
            .map(|(task, image)| Invocation::new(task, image.clone()))
            .collect();
        let responses = self.run_batch(&invocations).await?;

        for (index, response) in responses.iter().enumerate() {
            tracing::info!(
                index,
                model = %response.model,
                latency_ms = response.latency_ms,
                "{}",
                response.text
            );
            self.history.push(tasks[index].clone());
            self.history.push(response.text.clone());
        }

        Ok(responses)
    }

    /// Run a batch of invocations, failing fast on the first error.
    ///
    /// All invocations are submitted immediately; the pool bounds how many
    /// run at once. Results come back in input order. On failure the error
    /// identifies the failing index; workers already in flight are not
    /// cancelled.
    pub async fn run_batch(
        &self,
        invocations: &[Invocation],
    ) -> AdapterResult<Vec<ModelResponse>> {
        let handles = self.spawn_all(invocations, false);
        let mut results = Vec::with_capacity(handles.len());

        for (index, handle) in handles.into_iter().enumerate() {
            match handle.await {
                Ok(Ok(response)) => results.push(response),
                Ok(Err(error)) => {
                    return Err(AdapterError::Item {
                        index,
                        source: Box::new(error),
                    });
                }
                Err(error) => {
                    tracing::error!("Worker task panicked: {error}");
                    return Err(AdapterError::Item {
                        index,
                        source: Box::new(AdapterError::Runtime(format!(
                            "worker task failed: {error}"
                        ))),
                    });
                }
            }
        }

        Ok(results)
    }

    /// Blocking facade over [`run_batch`](Self::run_batch) for non-async
    /// callers. Spins up its own runtime, so it must not be called from
    /// within an async context.
    pub fn run_batch_blocking(
        &self,
        invocations: &[Invocation],
    ) -> AdapterResult<Vec<ModelResponse>> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(|e| AdapterError::Runtime(format!("Failed to build runtime: {e}")))?;
        runtime.block_on(self.run_batch(invocations))
    }

    /// Run a single invocation with the configured retry budget.
    ///
    /// Performs up to `retry_attempts` total calls with exponential backoff
    /// between attempts. Intermediate failures are logged and suppressed;
    /// non-retryable errors short-circuit immediately. An exhausted budget
    /// surfaces as [`AdapterError::RetryExhausted`].
    pub async fn run_with_retries(
        &self,
        task: &str,
        image: &ImageInput,
    ) -> AdapterResult<ModelResponse> {
        let invocation = Invocation::new(task, image.clone());
        invoke_with_retries(&self.adapter, &invocation, &self.options).await
    }

    /// Run a batch with per-item retry, collecting every outcome.
    ///
    /// Fail-soft counterpart to [`run_batch`](Self::run_batch): each item is
    /// retried independently and the returned vector holds one terminal
    /// outcome per input, in input order. Already-succeeded items are never
    /// re-run.
    pub async fn run_batch_with_retries(
        &self,
        invocations: &[Invocation],
    ) -> Vec<AdapterResult<ModelResponse>> {
        let handles = self.spawn_all(invocations, true);
        let mut results = Vec::with_capacity(handles.len());

        for handle in handles {
            match handle.await {
                Ok(result) => results.push(result),
                Err(error) => {
                    tracing::error!("Worker task panicked: {error}");
                    results.push(Err(AdapterError::Runtime(format!(
                        "worker task failed: {error}"
                    ))));
                }
            }
        }

        results
    }

    /// Spawn one worker task per invocation, each gated by the pool.
    fn spawn_all(
        &self,
        invocations: &[Invocation],
        with_retries: bool,
    ) -> Vec<JoinHandle<AdapterResult<ModelResponse>>> {
        let mut handles = Vec::with_capacity(invocations.len());

        for invocation in invocations {
            let pool = self.pool.clone();
            let adapter = self.adapter.clone();
            let options = self.options.clone();
            let invocation = invocation.clone();

            handles.push(tokio::spawn(async move {
                let _permit = pool
                    .acquire_owned()
                    .await
                    .map_err(|_| AdapterError::Runtime("worker pool closed".to_string()))?;
                if with_retries {
                    invoke_with_retries(&adapter, &invocation, &options).await
                } else {
                    invoke_once(&adapter, &invocation, &options).await
                }
            }));
        }

        handles
    }
}

/// One attempt against the adapter, bounded by the tighter of the runner's
/// and the adapter's own deadline. Elapsing the deadline is a retryable
/// failure.
async fn invoke_once(
    adapter: &Arc<dyn ModelAdapter>,
    invocation: &Invocation,
    options: &BatchOptions,
) -> AdapterResult<ModelResponse> {
    let timeout_ms = options
        .invoke_timeout_ms
        .min(adapter.timeout().as_millis() as u64);

    match tokio::time::timeout(
        Duration::from_millis(timeout_ms),
        adapter.invoke(&invocation.task, &invocation.image),
    )
    .await
    {
        Ok(result) => result,
        Err(_) => Err(AdapterError::Timeout { timeout_ms }),
    }
}

/// Retry loop around [`invoke_once`] with exponential backoff.
async fn invoke_with_retries(
    adapter: &Arc<dyn ModelAdapter>,
    invocation: &Invocation,
    options: &BatchOptions,
) -> AdapterResult<ModelResponse> {
    let mut last_error: Option<AdapterError> = None;

    for attempt in 0..options.retry_attempts {
        if attempt > 0 {
            let delay = retry::backoff_duration(attempt - 1, options.retry_delay_ms);
            tracing::debug!(
                "Retry {}/{} against {} after {delay:?}",
                attempt + 1,
                options.retry_attempts,
                adapter.name()
            );
            tokio::time::sleep(delay).await;
        }

        match invoke_once(adapter, invocation, options).await {
            Ok(response) => return Ok(response),
            Err(error) => {
                if !retry::is_retryable(&error) {
                    return Err(error);
                }
                tracing::debug!("Attempt {} failed: {error}", attempt + 1);
                last_error = Some(error);
            }
        }
    }

    Err(AdapterError::RetryExhausted {
        attempts: options.retry_attempts,
        last_error: last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no attempts made".to_string()),
    })
}
