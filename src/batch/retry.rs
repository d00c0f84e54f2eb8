//! Decides which invocation failures earn another attempt, and how long to
//! wait before it.

use crate::error::AdapterError;
use std::time::Duration;

/// Whether a failed attempt should be retried.
///
/// Only transient conditions qualify: an elapsed deadline, a rate limit
/// (429), a server-side error (5xx), or a connection-level failure that
/// carries no status code. Everything else is terminal — bad credentials and
/// malformed requests won't improve on a second try, input preparation
/// errors (image load/fetch) happen before the model is ever called, and
/// `RetryExhausted`/`Item` are themselves the output of a finished retry
/// loop.
pub fn is_retryable(error: &AdapterError) -> bool {
    match error {
        AdapterError::Timeout { .. } => true,
        AdapterError::Invocation {
            status_code,
            message,
        } => {
            if let Some(code) = status_code {
                return *code == 429 || (500..=599).contains(code);
            }
            // No status code means the request never got an HTTP answer;
            // retry only when the message points at a transport problem.
            message.contains("timed out") || message.contains("connect")
        }
        AdapterError::RetryExhausted { .. }
        | AdapterError::ShapeMismatch { .. }
        | AdapterError::Item { .. }
        | AdapterError::Image { .. }
        | AdapterError::Fetch { .. }
        | AdapterError::Runtime(_) => false,
    }
}

/// Backoff before retry number `attempt`: `base_delay * 2^attempt`,
/// never more than 30 seconds.
pub fn backoff_duration(attempt: u32, base_delay_ms: u64) -> Duration {
    let delay = base_delay_ms.saturating_mul(2u64.saturating_pow(attempt));
    Duration::from_millis(delay.min(30_000))
}
