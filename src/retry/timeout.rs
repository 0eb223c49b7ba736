//! Per-attempt timeouts.

use std::future::Future;
use std::time::Duration;

use super::error::TimeoutError;

/// Fail `attempt` with [`TimeoutError::Timeout`] if it does not settle
/// within `duration`.
///
/// The orchestrator itself never times out an attempt, so an operation that
/// hangs stalls the whole sequence. Wrapping each attempt turns a hang into
/// an ordinary failure that is classified and retried like any other:
///
/// ```rust
/// use rebound::testing::FixedBackoff;
/// use rebound::{retry, with_timeout};
/// use std::time::Duration;
///
/// # tokio_test::block_on(async {
/// let value = retry(
///     |attempt| {
///         with_timeout(
///             async move {
///                 if attempt == 1 {
///                     // first attempt hangs
///                     tokio::time::sleep(Duration::from_secs(60)).await;
///                 }
///                 Ok::<_, String>(attempt)
///             },
///             Duration::from_millis(10),
///         )
///     },
///     FixedBackoff::new(2, Duration::from_millis(1)),
/// )
/// .await
/// .unwrap();
///
/// assert_eq!(value, 2);
/// # });
/// ```
pub async fn with_timeout<T, E, Fut>(attempt: Fut, duration: Duration) -> Result<T, TimeoutError<E>>
where
    Fut: Future<Output = Result<T, E>>,
{
    match tokio::time::timeout(duration, attempt).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(TimeoutError::Inner(e)),
        Err(_) => Err(TimeoutError::Timeout { duration }),
    }
}

#[cfg(test)]
mod timeout_tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_timeout_triggers() {
        let result = with_timeout(
            async {
                tokio::time::sleep(Duration::from_secs(10)).await;
                Ok::<_, String>(42)
            },
            Duration::from_millis(10),
        )
        .await;

        assert_eq!(
            result,
            Err(TimeoutError::Timeout {
                duration: Duration::from_millis(10)
            })
        );
    }

    #[tokio::test]
    async fn test_passes_through_success() {
        let result = with_timeout(async { Ok::<_, String>(42) }, Duration::from_secs(1)).await;
        assert_eq!(result, Ok(42));
    }

    #[tokio::test]
    async fn test_passes_through_inner_error() {
        let result = with_timeout(async { Err::<i32, _>("inner error") }, Duration::from_secs(1)).await;
        assert_eq!(result.unwrap_err().into_inner(), Some("inner error"));
    }
}
