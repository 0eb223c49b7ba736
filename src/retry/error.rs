//! Error types for retry operations.

use std::fmt;
use std::time::Duration;

/// Why the orchestrator stopped retrying an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopReason {
    /// The error matched one of the configured unrecoverable matchers.
    Unrecoverable,
    /// The abort predicate returned `true`.
    Aborted,
    /// The strategy's retry budget was used up.
    Exhausted,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Unrecoverable => "unrecoverable error",
            Self::Aborted => "aborted by predicate",
            Self::Exhausted => "retries exhausted",
        };
        f.write_str(s)
    }
}

/// The operation's final error, along with metadata about the retry sequence.
///
/// The error value is exactly what the operation returned on its last
/// attempt; it is never wrapped or rewritten.
///
/// # Examples
///
/// ```rust
/// use rebound::testing::FixedBackoff;
/// use rebound::{retry, StopReason};
/// use std::time::Duration;
///
/// # tokio_test::block_on(async {
/// let err = retry(
///     |_| async { Err::<(), _>("always fails") },
///     FixedBackoff::new(2, Duration::from_millis(1)),
/// )
/// .await
/// .unwrap_err();
///
/// let failure = err.into_failure().unwrap();
/// assert_eq!(failure.error, "always fails");
/// assert_eq!(failure.attempts, 3); // 1 initial + 2 retries
/// assert_eq!(failure.reason, StopReason::Exhausted);
/// # });
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryFailure<E> {
    /// The error from the final attempt.
    pub error: E,
    /// Why retrying stopped.
    pub reason: StopReason,
    /// Total number of attempts made (initial + retries).
    pub attempts: u32,
    /// Total time spent, including delays.
    pub total_duration: Duration,
}

impl<E> RetryFailure<E> {
    /// Create a new RetryFailure.
    pub fn new(error: E, reason: StopReason, attempts: u32, total_duration: Duration) -> Self {
        Self {
            error,
            reason,
            attempts,
            total_duration,
        }
    }

    /// Extract the final error, discarding metadata.
    pub fn into_error(self) -> E {
        self.error
    }
}

impl<E: fmt::Display> fmt::Display for RetryFailure<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} after {} attempts ({:?}): {}",
            self.reason, self.attempts, self.total_duration, self.error
        )
    }
}

impl<E: std::error::Error + 'static> std::error::Error for RetryFailure<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Invalid [`RetryOptions`](super::RetryOptions), detected before the
/// operation is first invoked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// The scale factor was zero, negative, NaN or infinite.
    InvalidScaleFactor(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidScaleFactor(got) => write!(
                f,
                "expected scale factor to be a finite number greater than zero, got {}",
                got
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Error returned by [`retry`](super::retry) and [`retry_with`](super::retry_with).
#[derive(Debug, Clone, PartialEq)]
pub enum RetryError<E> {
    /// The options were invalid; the operation never ran.
    Config(ConfigError),
    /// The operation failed and will not be retried.
    Failed(RetryFailure<E>),
    /// The cancellation token fired before the sequence finished.
    Cancelled {
        /// Attempts started before cancellation.
        attempts: u32,
    },
}

impl<E> RetryError<E> {
    /// Returns true if this is a configuration error.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Returns true if the sequence was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// Why retrying stopped, if the operation itself failed.
    pub fn stop_reason(&self) -> Option<StopReason> {
        match self {
            Self::Failed(failure) => Some(failure.reason),
            _ => None,
        }
    }

    /// Get a reference to the operation's final error, if any.
    pub fn operation_error(&self) -> Option<&E> {
        match self {
            Self::Failed(failure) => Some(&failure.error),
            _ => None,
        }
    }

    /// Extract the operation's final error, discarding metadata.
    pub fn into_operation_error(self) -> Option<E> {
        self.into_failure().map(RetryFailure::into_error)
    }

    /// Extract the failure details, if the operation itself failed.
    pub fn into_failure(self) -> Option<RetryFailure<E>> {
        match self {
            Self::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}

impl<E> From<ConfigError> for RetryError<E> {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl<E: fmt::Display> fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "invalid retry options: {}", e),
            Self::Failed(failure) => write!(f, "{}", failure),
            Self::Cancelled { attempts } => {
                write!(f, "retry cancelled after {} attempts", attempts)
            }
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for RetryError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Failed(failure) => Some(&failure.error),
            Self::Cancelled { .. } => None,
        }
    }
}

/// Error returned by [`with_timeout`](super::with_timeout).
///
/// Wraps either a timeout or the inner error of the attempt.
///
/// # Examples
///
/// ```rust
/// use rebound::{with_timeout, TimeoutError};
/// use std::time::Duration;
///
/// # tokio_test::block_on(async {
/// let result = with_timeout(
///     async {
///         tokio::time::sleep(Duration::from_secs(10)).await;
///         Ok::<_, String>(42)
///     },
///     Duration::from_millis(10),
/// )
/// .await;
///
/// match result {
///     Err(TimeoutError::Timeout { duration }) => {
///         assert_eq!(duration, Duration::from_millis(10));
///     }
///     _ => panic!("Expected timeout"),
/// }
/// # });
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeoutError<E> {
    /// The attempt timed out.
    Timeout {
        /// The timeout duration that was exceeded.
        duration: Duration,
    },
    /// The attempt failed before the timeout.
    Inner(E),
}

impl<E> TimeoutError<E> {
    /// Returns true if this is a timeout error.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Get the inner error if present.
    pub fn into_inner(self) -> Option<E> {
        match self {
            Self::Inner(e) => Some(e),
            Self::Timeout { .. } => None,
        }
    }
}

impl<E: fmt::Display> fmt::Display for TimeoutError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout { duration } => write!(f, "attempt timed out after {:?}", duration),
            Self::Inner(e) => write!(f, "{}", e),
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for TimeoutError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Timeout { .. } => None,
            Self::Inner(e) => Some(e),
        }
    }
}
