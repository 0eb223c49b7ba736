//! Runtime options for a single retry invocation.

use std::fmt;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::error::{ConfigError, TimeoutError};

type Matcher<E> = Box<dyn Fn(&E) -> bool + Send + Sync>;
type AbortFn<E> = Box<dyn Fn(&E, u32) -> bool + Send + Sync>;
type HookFn<E> = Box<dyn Fn(&RetryEvent<'_, E>) + Send + Sync>;

/// Errors that expose a comparable kind.
///
/// Implement this to mark whole categories of an error type as
/// unrecoverable with [`RetryOptions::unrecoverable_kind`].
///
/// # Examples
///
/// ```rust
/// use rebound::ClassifyError;
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// enum Kind {
///     Network,
///     Auth,
/// }
///
/// struct ApiError {
///     kind: Kind,
/// }
///
/// impl ClassifyError for ApiError {
///     type Kind = Kind;
///
///     fn kind(&self) -> Kind {
///         self.kind
///     }
/// }
/// ```
pub trait ClassifyError {
    /// The kind type compared against registered kinds.
    type Kind: PartialEq + Send + Sync + 'static;

    /// The kind of this error.
    fn kind(&self) -> Self::Kind;
}

impl ClassifyError for std::io::Error {
    type Kind = std::io::ErrorKind;

    fn kind(&self) -> std::io::ErrorKind {
        std::io::Error::kind(self)
    }
}

/// Kind of a [`TimeoutError`], for classifying per-attempt timeouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeoutKind {
    /// The attempt ran past its deadline.
    Timeout,
    /// The attempt failed on its own.
    Inner,
}

impl<E> ClassifyError for TimeoutError<E> {
    type Kind = TimeoutKind;

    fn kind(&self) -> TimeoutKind {
        match self {
            Self::Timeout { .. } => TimeoutKind::Timeout,
            Self::Inner(_) => TimeoutKind::Inner,
        }
    }
}

/// Information about a failed attempt, passed to the `on_retry` hook.
#[derive(Debug, Clone)]
pub struct RetryEvent<'a, E> {
    /// Which attempt just failed (1-indexed).
    pub attempt: u32,
    /// Failures observed so far, as handed to the strategy.
    pub retry_count: u32,
    /// The error from the failed attempt.
    pub error: &'a E,
    /// Delay before the next attempt, or `None` if retrying stops here.
    pub next_delay: Option<Duration>,
    /// Total elapsed time since the first attempt.
    pub elapsed: Duration,
}

/// Options controlling one call to [`retry_with`](super::retry_with).
///
/// Everything is optional; `RetryOptions::default()` retries every error
/// with unscaled delays until the strategy's budget runs out.
///
/// # Examples
///
/// ```rust
/// use rebound::RetryOptions;
///
/// #[derive(Debug)]
/// enum DbError {
///     Deadlock,
///     SyntaxError,
/// }
///
/// let options = RetryOptions::<DbError>::new()
///     .with_scale_factor(2.0)
///     .unrecoverable_if(|e| matches!(e, DbError::SyntaxError))
///     .abort_retry(|_, retry_count| retry_count >= 10);
///
/// assert_eq!(options.scale_factor(), 2.0);
/// assert!(options.is_unrecoverable(&DbError::SyntaxError));
/// assert!(!options.is_unrecoverable(&DbError::Deadlock));
/// ```
pub struct RetryOptions<E> {
    abort_retry: Option<AbortFn<E>>,
    scale_factor: f64,
    unrecoverable: Vec<Matcher<E>>,
    on_retry: Option<HookFn<E>>,
    cancel: Option<CancellationToken>,
}

impl<E> RetryOptions<E> {
    /// Options with no hooks and a scale factor of `1.0`.
    pub fn new() -> Self {
        Self {
            abort_retry: None,
            scale_factor: 1.0,
            unrecoverable: Vec::new(),
            on_retry: None,
            cancel: None,
        }
    }

    /// Multiply every strategy delay by `factor`.
    ///
    /// The value is checked when the retry starts: anything that is not a
    /// finite number greater than zero fails the call with
    /// [`ConfigError::InvalidScaleFactor`] before the operation runs.
    pub fn with_scale_factor(mut self, factor: f64) -> Self {
        self.scale_factor = factor;
        self
    }

    /// Stop retrying as soon as `predicate(error, retry_count)` returns true.
    ///
    /// `retry_count` is the number of failures observed so far (1 on the
    /// first failure).
    pub fn abort_retry<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&E, u32) -> bool + Send + Sync + 'static,
    {
        self.abort_retry = Some(Box::new(predicate));
        self
    }

    /// Never retry errors for which `predicate` returns true.
    ///
    /// May be called repeatedly; an error is unrecoverable if any registered
    /// matcher accepts it.
    pub fn unrecoverable_if<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.unrecoverable.push(Box::new(predicate));
        self
    }

    /// Never retry errors of the given kind.
    ///
    /// ```rust
    /// use rebound::RetryOptions;
    /// use std::io;
    ///
    /// let options = RetryOptions::<io::Error>::new()
    ///     .unrecoverable_kind(io::ErrorKind::PermissionDenied)
    ///     .unrecoverable_kind(io::ErrorKind::NotFound);
    ///
    /// assert!(options.is_unrecoverable(&io::Error::from(io::ErrorKind::NotFound)));
    /// assert!(!options.is_unrecoverable(&io::Error::from(io::ErrorKind::TimedOut)));
    /// ```
    pub fn unrecoverable_kind(self, kind: E::Kind) -> Self
    where
        E: ClassifyError + 'static,
    {
        self.unrecoverable_if(move |e| e.kind() == kind)
    }

    /// Observe every failed attempt.
    ///
    /// The hook runs synchronously after classification and before any
    /// delay; use it for logging or metrics, not for blocking work.
    pub fn on_retry<F>(mut self, hook: F) -> Self
    where
        F: Fn(&RetryEvent<'_, E>) + Send + Sync + 'static,
    {
        self.on_retry = Some(Box::new(hook));
        self
    }

    /// Cancel the retry sequence when `token` fires.
    ///
    /// Cancellation interrupts either the in-flight attempt (its future is
    /// dropped) or the pending delay.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// The configured scale factor.
    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// The cancellation token, if any.
    pub fn cancellation(&self) -> Option<&CancellationToken> {
        self.cancel.as_ref()
    }

    /// Returns true if `error` matches any unrecoverable matcher.
    pub fn is_unrecoverable(&self, error: &E) -> bool {
        self.unrecoverable.iter().any(|matches| matches(error))
    }

    pub(crate) fn should_abort(&self, error: &E, retry_count: u32) -> bool {
        self.abort_retry
            .as_ref()
            .is_some_and(|abort| abort(error, retry_count))
    }

    pub(crate) fn notify(&self, event: &RetryEvent<'_, E>) {
        if let Some(hook) = &self.on_retry {
            hook(event);
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.scale_factor.is_finite() && self.scale_factor > 0.0 {
            Ok(())
        } else {
            Err(ConfigError::InvalidScaleFactor(self.scale_factor))
        }
    }
}

impl RetryOptions<Box<dyn std::error::Error + Send + Sync>> {
    /// Never retry boxed errors whose concrete type is `T`.
    ///
    /// ```rust
    /// use rebound::RetryOptions;
    /// use std::error::Error;
    ///
    /// let options = RetryOptions::<Box<dyn Error + Send + Sync>>::new()
    ///     .unrecoverable_type::<std::fmt::Error>();
    ///
    /// let fatal: Box<dyn Error + Send + Sync> = Box::new(std::fmt::Error);
    /// let transient: Box<dyn Error + Send + Sync> = "try again".into();
    /// assert!(options.is_unrecoverable(&fatal));
    /// assert!(!options.is_unrecoverable(&transient));
    /// ```
    pub fn unrecoverable_type<T: std::error::Error + 'static>(self) -> Self {
        self.unrecoverable_if(|e| e.downcast_ref::<T>().is_some())
    }
}

impl<E> Default for RetryOptions<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for RetryOptions<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryOptions")
            .field("scale_factor", &self.scale_factor)
            .field("abort_retry", &self.abort_retry.is_some())
            .field("unrecoverable", &self.unrecoverable.len())
            .field("on_retry", &self.on_retry.is_some())
            .field("cancel", &self.cancel)
            .finish()
    }
}

/// Serializable subset of [`RetryOptions`], for loading from config files.
///
/// Closures cannot be deserialized, so only the scale factor lives here;
/// hooks are attached after conversion.
///
/// ```rust,ignore
/// use rebound::{RetryOptions, RetrySettings};
///
/// let settings: RetrySettings = serde_json::from_str(r#"{"scale_factor": 0.5}"#)?;
/// let options: RetryOptions<std::io::Error> = settings.into();
/// assert_eq!(options.scale_factor(), 0.5);
/// ```
#[cfg(feature = "serde")]
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    /// Multiplier applied to every delay.
    pub scale_factor: f64,
}

#[cfg(feature = "serde")]
impl Default for RetrySettings {
    fn default() -> Self {
        Self { scale_factor: 1.0 }
    }
}

#[cfg(feature = "serde")]
impl<E> From<RetrySettings> for RetryOptions<E> {
    fn from(settings: RetrySettings) -> Self {
        Self::new().with_scale_factor(settings.scale_factor)
    }
}

#[cfg(test)]
mod options_tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum TestError {
        Transient,
        Fatal,
    }

    #[test]
    fn test_defaults() {
        let options = RetryOptions::<TestError>::default();
        assert_eq!(options.scale_factor(), 1.0);
        assert!(options.cancellation().is_none());
        assert!(!options.is_unrecoverable(&TestError::Fatal));
        assert!(!options.should_abort(&TestError::Fatal, 100));
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_scale_factors() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let options = RetryOptions::<TestError>::new().with_scale_factor(bad);
            assert!(options.validate().is_err(), "accepted {}", bad);
        }
        let options = RetryOptions::<TestError>::new().with_scale_factor(0.001);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_any_matcher_marks_unrecoverable() {
        let options = RetryOptions::<TestError>::new()
            .unrecoverable_if(|e| *e == TestError::Fatal)
            .unrecoverable_if(|_| false);
        assert!(options.is_unrecoverable(&TestError::Fatal));
        assert!(!options.is_unrecoverable(&TestError::Transient));
    }

    #[test]
    fn test_abort_receives_retry_count() {
        let options = RetryOptions::<TestError>::new().abort_retry(|_, count| count >= 2);
        assert!(!options.should_abort(&TestError::Transient, 1));
        assert!(options.should_abort(&TestError::Transient, 2));
    }

    #[test]
    fn test_timeout_errors_classify_by_kind() {
        let options = RetryOptions::<TimeoutError<TestError>>::new()
            .unrecoverable_kind(TimeoutKind::Timeout);
        assert!(options.is_unrecoverable(&TimeoutError::Timeout {
            duration: Duration::from_secs(1)
        }));
        assert!(!options.is_unrecoverable(&TimeoutError::Inner(TestError::Fatal)));
    }

    #[test]
    fn test_debug_hides_closures() {
        let options = RetryOptions::<TestError>::new()
            .abort_retry(|_, _| true)
            .on_retry(|_| {});
        let debug = format!("{:?}", options);
        assert!(debug.contains("RetryOptions"));
        assert!(debug.contains("abort_retry: true"));
        assert!(debug.contains("on_retry: true"));
    }
}
