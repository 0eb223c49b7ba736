//! The backoff strategy capability consumed by the orchestrator.

use std::sync::Arc;
use std::time::Duration;

/// A policy deciding how many retries are allowed and how long to wait
/// before each one.
///
/// Strategies are plain values: the orchestrator only reads from them, so
/// any implementation can be swapped in without touching the retry loop.
/// Pass `&strategy` or an `Arc` to share one configured strategy across
/// many calls, or `MyStrategy::default()` for a one-off.
///
/// # Examples
///
/// ```rust
/// use rebound::BackoffStrategy;
/// use std::time::Duration;
///
/// /// Waits 50ms, 100ms, 150ms, ...
/// struct Linear;
///
/// impl BackoffStrategy for Linear {
///     fn max_retries(&self) -> u32 {
///         4
///     }
///
///     fn next_delay(&self, retry_count: u32) -> Duration {
///         Duration::from_millis(50) * retry_count
///     }
/// }
///
/// assert_eq!(Linear.next_delay(1), Duration::from_millis(50));
/// assert_eq!(Linear.next_delay(3), Duration::from_millis(150));
/// ```
pub trait BackoffStrategy {
    /// Maximum number of retries after the initial attempt.
    ///
    /// `max_retries() == 3` means up to 4 invocations in total. Zero means
    /// the operation runs exactly once.
    fn max_retries(&self) -> u32;

    /// Delay before the next attempt.
    ///
    /// `retry_count` is the number of failures observed so far, so it is `1`
    /// before the first retry. The orchestrator multiplies the result by the
    /// configured scale factor; a zero delay retries without pausing.
    fn next_delay(&self, retry_count: u32) -> Duration;
}

impl<S: BackoffStrategy + ?Sized> BackoffStrategy for &S {
    fn max_retries(&self) -> u32 {
        (**self).max_retries()
    }

    fn next_delay(&self, retry_count: u32) -> Duration {
        (**self).next_delay(retry_count)
    }
}

impl<S: BackoffStrategy + ?Sized> BackoffStrategy for Box<S> {
    fn max_retries(&self) -> u32 {
        (**self).max_retries()
    }

    fn next_delay(&self, retry_count: u32) -> Duration {
        (**self).next_delay(retry_count)
    }
}

impl<S: BackoffStrategy + ?Sized> BackoffStrategy for Arc<S> {
    fn max_retries(&self) -> u32 {
        (**self).max_retries()
    }

    fn next_delay(&self, retry_count: u32) -> Duration {
        (**self).next_delay(retry_count)
    }
}

/// Scale a strategy delay, saturating at `Duration::MAX`.
pub(crate) fn scale_delay(delay: Duration, scale_factor: f64) -> Duration {
    if scale_factor == 1.0 {
        return delay;
    }
    Duration::try_from_secs_f64(delay.as_secs_f64() * scale_factor).unwrap_or(Duration::MAX)
}
