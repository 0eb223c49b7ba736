//! Retry orchestration for fallible async operations.
//!
//! The orchestrator runs an operation, and on failure decides whether to try
//! again and how long to wait first:
//!
//! - **Strategy**: a [`BackoffStrategy`] supplies the retry budget and the
//!   delay before each retry. It is the extension point; the orchestrator
//!   never looks inside it.
//! - **Options**: [`RetryOptions`] scale every delay, mark errors as
//!   unrecoverable, abort early through a predicate, observe failures, and
//!   cancel the sequence.
//! - **Result**: exactly one value, or exactly one [`RetryError`] carrying the
//!   operation's own final error unchanged.
//!
//! # Quick Start
//!
//! ```rust
//! use rebound::testing::FixedBackoff;
//! use rebound::{retry_with, RetryOptions};
//! use std::sync::atomic::{AtomicU32, Ordering};
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! let calls = AtomicU32::new(0);
//!
//! let result = retry_with(
//!     |attempt| {
//!         calls.fetch_add(1, Ordering::SeqCst);
//!         async move {
//!             if attempt < 3 {
//!                 Err(format!("attempt {} failed", attempt))
//!             } else {
//!                 Ok("connected")
//!             }
//!         }
//!     },
//!     FixedBackoff::new(3, Duration::from_millis(10)),
//!     RetryOptions::new().with_scale_factor(0.1),
//! )
//! .await;
//!
//! assert_eq!(result, Ok("connected"));
//! assert_eq!(calls.load(Ordering::SeqCst), 3);
//! # });
//! ```
//!
//! # Counting
//!
//! Attempts are numbered from 1. After each failure the orchestrator derives
//! `retry_count`, the number of failures seen so far, and hands it to both
//! the abort predicate and [`BackoffStrategy::next_delay`]. The first retry
//! therefore waits `next_delay(1)`.
//!
//! # Error Types
//!
//! - [`RetryError`]: configuration error, final operation failure, or cancellation
//! - [`RetryFailure`]: the final operation error plus [`StopReason`] and attempt count
//! - [`TimeoutError`]: returned by [`with_timeout`] for per-attempt deadlines

mod error;
mod options;
mod run;
mod strategy;
mod timeout;

pub use error::{ConfigError, RetryError, RetryFailure, StopReason, TimeoutError};
#[cfg(feature = "serde")]
pub use options::RetrySettings;
pub use options::{ClassifyError, RetryEvent, RetryOptions, TimeoutKind};
pub use run::{retry, retry_with};
pub use strategy::BackoffStrategy;
pub use timeout::with_timeout;
