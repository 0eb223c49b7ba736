//! # Rebound
//!
//! Retry-with-backoff for async operations.
//!
//! ## Overview
//!
//! Hand [`retry`] an operation and a [`BackoffStrategy`]; it runs the
//! operation, and on failure waits and tries again until the operation
//! succeeds, the retry budget runs out, or the error is classified as not
//! worth retrying. [`retry_with`] adds [`RetryOptions`] for scaling delays,
//! unrecoverable error matching, an abort predicate, an observer hook and
//! cancellation.
//!
//! The strategy decides *how long* and *how many times*; the orchestrator
//! decides *whether*. Backoff curves are left to the caller.
//!
//! ## Quick Example
//!
//! ```rust
//! use rebound::{retry, BackoffStrategy};
//! use std::time::Duration;
//!
//! struct Doubling;
//!
//! impl BackoffStrategy for Doubling {
//!     fn max_retries(&self) -> u32 {
//!         5
//!     }
//!
//!     fn next_delay(&self, retry_count: u32) -> Duration {
//!         Duration::from_millis(1) * 2u32.pow(retry_count - 1)
//!     }
//! }
//!
//! # tokio_test::block_on(async {
//! let result = retry(
//!     |attempt| async move {
//!         if attempt < 3 {
//!             Err(format!("connection refused on attempt {}", attempt))
//!         } else {
//!             Ok("connected")
//!         }
//!     },
//!     Doubling,
//! )
//! .await;
//!
//! assert_eq!(result, Ok("connected"));
//! # });
//! ```
//!
//! ## Features
//!
//! - `tracing` (default): emit `tracing` events when retries are scheduled,
//!   abandoned, or cancelled
//! - `serde`: deserialize [`RetrySettings`] from configuration

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod retry;
pub mod testing;

// Re-exports
#[cfg(feature = "serde")]
pub use retry::RetrySettings;
pub use retry::{
    retry, retry_with, with_timeout, BackoffStrategy, ClassifyError, ConfigError, RetryError,
    RetryEvent, RetryFailure, RetryOptions, StopReason, TimeoutError, TimeoutKind,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::retry::{
        retry, retry_with, BackoffStrategy, ClassifyError, RetryError, RetryOptions, StopReason,
    };
}
