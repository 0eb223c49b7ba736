//! The retry orchestrator.

use std::future::Future;

use tokio::time::Instant;

use super::error::{RetryError, RetryFailure, StopReason};
use super::options::{RetryEvent, RetryOptions};
use super::strategy::{scale_delay, BackoffStrategy};

/// Retry `operation` with default [`RetryOptions`].
///
/// See [`retry_with`] for the full contract.
///
/// # Example
///
/// ```rust
/// use rebound::retry;
/// use rebound::testing::FixedBackoff;
/// use std::time::Duration;
///
/// # tokio_test::block_on(async {
/// let value = retry(
///     |attempt| async move {
///         if attempt < 3 {
///             Err("not yet")
///         } else {
///             Ok(attempt * 10)
///         }
///     },
///     FixedBackoff::new(5, Duration::from_millis(1)),
/// )
/// .await
/// .unwrap();
///
/// assert_eq!(value, 30);
/// # });
/// ```
pub async fn retry<T, E, S, F, Fut>(operation: F, strategy: S) -> Result<T, RetryError<E>>
where
    S: BackoffStrategy,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    retry_with(operation, strategy, RetryOptions::default()).await
}

/// Retry `operation` according to `strategy` and `options`.
///
/// The operation receives the attempt number, starting at 1. It is invoked
/// sequentially, at most `strategy.max_retries() + 1` times, until one of:
///
/// - it succeeds: the value is returned and nothing else runs;
/// - its error matches an unrecoverable matcher ([`StopReason::Unrecoverable`]);
/// - the abort predicate returns true ([`StopReason::Aborted`]);
/// - the retry budget is spent ([`StopReason::Exhausted`]);
/// - the cancellation token fires ([`RetryError::Cancelled`]).
///
/// Between attempts the loop waits `strategy.next_delay(retry_count)`
/// multiplied by the scale factor, where `retry_count` is the number of
/// failures seen so far. Invalid options are reported as
/// [`RetryError::Config`] before the operation is first called.
///
/// Synchronous operations can be lifted with `std::future::ready`:
///
/// ```rust
/// use rebound::{retry_with, RetryOptions, StopReason};
/// use rebound::testing::FixedBackoff;
/// use std::future::ready;
/// use std::time::Duration;
///
/// #[derive(Debug, PartialEq)]
/// enum ParseError {
///     Malformed,
/// }
///
/// # tokio_test::block_on(async {
/// let options = RetryOptions::<ParseError>::new()
///     .unrecoverable_if(|e| *e == ParseError::Malformed);
///
/// let err = retry_with(
///     |_| ready(Err::<u32, _>(ParseError::Malformed)),
///     FixedBackoff::new(3, Duration::from_millis(1)),
///     options,
/// )
/// .await
/// .unwrap_err();
///
/// assert_eq!(err.stop_reason(), Some(StopReason::Unrecoverable));
/// assert_eq!(err.into_operation_error(), Some(ParseError::Malformed));
/// # });
/// ```
pub async fn retry_with<T, E, S, F, Fut>(
    mut operation: F,
    strategy: S,
    options: RetryOptions<E>,
) -> Result<T, RetryError<E>>
where
    S: BackoffStrategy,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    options.validate()?;

    let start = Instant::now();
    let max_retries = strategy.max_retries();
    let mut attempt = 1u32;

    loop {
        let outcome = match options.cancellation() {
            Some(token) => {
                if token.is_cancelled() {
                    return Err(cancelled(attempt - 1));
                }
                tokio::select! {
                    biased;
                    () = token.cancelled() => return Err(cancelled(attempt)),
                    outcome = operation(attempt) => outcome,
                }
            }
            None => operation(attempt).await,
        };

        let error = match outcome {
            Ok(value) => return Ok(value),
            Err(error) => error,
        };

        // Failures so far; also the number of the attempt that just failed.
        let failed_attempt = attempt;
        let retry_count = failed_attempt;
        attempt += 1;

        let verdict = if options.is_unrecoverable(&error) {
            Err(StopReason::Unrecoverable)
        } else if options.should_abort(&error, retry_count) {
            Err(StopReason::Aborted)
        } else if retry_count > max_retries {
            Err(StopReason::Exhausted)
        } else {
            Ok(scale_delay(
                strategy.next_delay(retry_count),
                options.scale_factor(),
            ))
        };

        options.notify(&RetryEvent {
            attempt: failed_attempt,
            retry_count,
            error: &error,
            next_delay: verdict.ok(),
            elapsed: start.elapsed(),
        });

        let delay = match verdict {
            Ok(delay) => delay,
            Err(reason) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    attempts = failed_attempt,
                    %reason,
                    "giving up on operation"
                );
                return Err(RetryError::Failed(RetryFailure::new(
                    error,
                    reason,
                    failed_attempt,
                    start.elapsed(),
                )));
            }
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(
            attempt = failed_attempt,
            retry_count,
            delay_ms = delay.as_millis() as u64,
            "attempt failed, scheduling retry"
        );

        drop(error);
        if delay.is_zero() {
            continue;
        }
        match options.cancellation() {
            Some(token) => {
                tokio::select! {
                    biased;
                    () = token.cancelled() => return Err(cancelled(failed_attempt)),
                    () = tokio::time::sleep(delay) => {}
                }
            }
            None => tokio::time::sleep(delay).await,
        }
    }
}

fn cancelled<E>(attempts: u32) -> RetryError<E> {
    #[cfg(feature = "tracing")]
    tracing::debug!(attempts, "retry cancelled");
    RetryError::Cancelled { attempts }
}
