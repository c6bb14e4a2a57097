//! Bounded retry with backoff for downstream collaborator calls.
//!
//! Each call to the credential signer or the durable store is wrapped with a
//! short timeout and a small retry budget. Only recoverable errors are
//! retried; client-input errors surface immediately.

use ridevault_core::{AppError, ErrorMetadata};
use std::future::Future;
use std::time::Duration;

const INITIAL_BACKOFF: Duration = Duration::from_millis(100);

/// Timeout and attempt budget for one downstream operation.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub timeout: Duration,
}

/// Run `f` until it succeeds, the attempt budget is exhausted, or it fails
/// with a non-recoverable error. Backoff doubles between attempts.
pub async fn with_retry<T, F, Fut>(
    operation: &str,
    policy: RetryPolicy,
    f: F,
) -> Result<T, AppError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    let attempts = policy.attempts.max(1);
    let mut backoff = INITIAL_BACKOFF;

    for attempt in 1..=attempts {
        let outcome = tokio::time::timeout(policy.timeout, f()).await;

        let err = match outcome {
            Ok(Ok(value)) => return Ok(value),
            Ok(Err(err)) => {
                if !err.is_recoverable() {
                    return Err(err);
                }
                err
            }
            Err(_) => AppError::Internal(format!(
                "{} timed out after {:?}",
                operation, policy.timeout
            )),
        };

        if attempt == attempts {
            tracing::error!(
                operation = operation,
                attempts = attempts,
                error = %err,
                "Downstream call failed; retry budget exhausted"
            );
            return Err(err);
        }

        tracing::warn!(
            operation = operation,
            attempt = attempt,
            error = %err,
            backoff_ms = backoff.as_millis() as u64,
            "Downstream call failed; retrying"
        );
        tokio::time::sleep(backoff).await;
        backoff *= 2;
    }

    // The loop always returns on its final attempt.
    Err(AppError::Internal(format!("{} failed", operation)))
}
