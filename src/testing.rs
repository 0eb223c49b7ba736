//! Testing utilities for code built on the retry orchestrator.
//!
//! Real backoff curves belong to the caller, so this module only ships
//! predictable strategies for tests, plus assertion macros for retry results.
//!
//! # Examples
//!
//! ## Recording what the orchestrator asked for
//!
//! ```rust
//! use rebound::retry;
//! use rebound::testing::RecordingBackoff;
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! let backoff = RecordingBackoff::new(3, Duration::ZERO);
//!
//! let _ = retry(|_| async { Err::<(), _>("nope") }, &backoff).await;
//!
//! // one delay lookup per retry, counted from 1
//! assert_eq!(backoff.requested(), vec![1, 2, 3]);
//! # });
//! ```
//!
//! ## Assertion Macros
//!
//! ```rust
//! use rebound::{assert_stopped, retry, StopReason};
//! use rebound::testing::FixedBackoff;
//!
//! # tokio_test::block_on(async {
//! let result = retry(|_| async { Err::<(), _>("nope") }, FixedBackoff::immediate(0)).await;
//! assert_stopped!(result, StopReason::Exhausted);
//! # });
//! ```

use std::sync::Mutex;
use std::time::Duration;

use crate::retry::BackoffStrategy;

/// A strategy with a fixed budget and the same delay before every retry.
///
/// `FixedBackoff::default()` allows three immediate retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedBackoff {
    max_retries: u32,
    delay: Duration,
}

impl FixedBackoff {
    /// Allow `max_retries` retries, waiting `delay` before each.
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries, delay }
    }

    /// Allow `max_retries` retries with no delay.
    pub fn immediate(max_retries: u32) -> Self {
        Self::new(max_retries, Duration::ZERO)
    }
}

impl Default for FixedBackoff {
    fn default() -> Self {
        Self::immediate(3)
    }
}

impl BackoffStrategy for FixedBackoff {
    fn max_retries(&self) -> u32 {
        self.max_retries
    }

    fn next_delay(&self, _retry_count: u32) -> Duration {
        self.delay
    }
}

/// A [`FixedBackoff`] that remembers every `retry_count` it was asked about.
///
/// Pass it by reference so the log can be inspected after the retry finishes.
#[derive(Debug)]
pub struct RecordingBackoff {
    inner: FixedBackoff,
    requested: Mutex<Vec<u32>>,
}

impl RecordingBackoff {
    /// Allow `max_retries` retries, waiting `delay` before each.
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self {
            inner: FixedBackoff::new(max_retries, delay),
            requested: Mutex::new(Vec::new()),
        }
    }

    /// The `retry_count` values passed to `next_delay`, in call order.
    pub fn requested(&self) -> Vec<u32> {
        match self.requested.lock() {
            Ok(log) => log.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl BackoffStrategy for RecordingBackoff {
    fn max_retries(&self) -> u32 {
        self.inner.max_retries()
    }

    fn next_delay(&self, retry_count: u32) -> Duration {
        match self.requested.lock() {
            Ok(mut log) => log.push(retry_count),
            Err(poisoned) => poisoned.into_inner().push(retry_count),
        }
        self.inner.next_delay(retry_count)
    }
}

/// Assert that a retry stopped for the given [`StopReason`](crate::StopReason).
///
/// Panics if the result is a success, a configuration error, a cancellation,
/// or a failure with a different reason.
#[macro_export]
macro_rules! assert_stopped {
    ($result:expr, $reason:expr) => {
        match $result {
            Err($crate::RetryError::Failed(failure)) => {
                assert_eq!(
                    failure.reason, $reason,
                    "Expected retry to stop with {:?}, stopped with {:?}",
                    $reason, failure.reason
                );
            }
            Err(other) => panic!("Expected operation failure, got {:?}", other),
            Ok(v) => panic!("Expected operation failure, got Ok({:?})", v),
        }
    };
}

/// Assert that a retry call made exactly `n` attempts before failing.
///
/// ```rust
/// use rebound::{assert_attempts, retry};
/// use rebound::testing::FixedBackoff;
///
/// # tokio_test::block_on(async {
/// let result = retry(|_| async { Err::<(), _>("nope") }, FixedBackoff::immediate(2)).await;
/// assert_attempts!(result, 3);
/// # });
/// ```
#[macro_export]
macro_rules! assert_attempts {
    ($result:expr, $n:expr) => {
        match $result {
            Err($crate::RetryError::Failed(failure)) => assert_eq!(failure.attempts, $n),
            Err(other) => panic!("Expected operation failure, got {:?}", other),
            Ok(v) => panic!("Expected operation failure, got Ok({:?})", v),
        }
    };
}
