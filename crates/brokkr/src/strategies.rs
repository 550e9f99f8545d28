//! Delay computation and retry predicates
//!
//! `calculate_delay` turns a policy and a 1-indexed attempt number into the
//! wait before the next attempt. Predicates decide whether an error is worth
//! retrying at all; the default is to retry everything.

use rand::Rng;
use std::error::Error;
use std::time::Duration;

use crate::policy::{BackoffStrategy, RetryPolicy};

/// Calculate the delay before the next retry attempt.
///
/// The nominal delay depends only on the strategy and the attempt number;
/// jitter perturbs the realized wait by a uniform factor in [0.8, 1.2),
/// rounded to the nearest millisecond.
///
/// # Example
///
/// ```rust
/// use brokkr::{calculate_delay, RetryPolicy};
///
/// let policy = RetryPolicy {
///     initial_delay_ms: 1000,
///     jitter: false,
///     ..RetryPolicy::default()
/// };
///
/// assert_eq!(calculate_delay(&policy, 1, false).as_millis(), 1000);
/// assert_eq!(calculate_delay(&policy, 2, false).as_millis(), 2000);
/// ```
pub fn calculate_delay(policy: &RetryPolicy, attempt: u32, jitter: bool) -> Duration {
    // Attempt is 1-indexed; the first wait uses the base delay unscaled.
    let attempt_index = attempt.saturating_sub(1);

    let nominal_ms = match policy.strategy {
        BackoffStrategy::None => 0.0,

        BackoffStrategy::FixedDelay => policy.initial_delay_ms as f64,

        BackoffStrategy::ExponentialBackoff => {
            policy.initial_delay_ms as f64 * policy.backoff_multiplier.powf(f64::from(attempt_index))
        }

        BackoffStrategy::LinearBackoff => {
            policy.initial_delay_ms as f64 * f64::from(attempt_index + 1)
        }
    };

    let capped_ms = match policy.max_delay_ms {
        Some(cap) => nominal_ms.min(cap as f64),
        None => nominal_ms,
    };

    let final_ms = if jitter && capped_ms > 0.0 {
        let factor = rand::rng().random_range(0.8..1.2);
        (capped_ms * factor).round() as u64
    } else {
        capped_ms as u64
    };

    Duration::from_millis(final_ms)
}

/// A predicate that decides whether an error should be retried.
///
/// Implement this to short-circuit the retry loop for errors known to be
/// permanent. The triggering error is propagated to the caller unchanged
/// when the predicate vetoes a retry.
///
/// # Example
///
/// ```rust
/// use brokkr::RetryPredicate;
/// use std::io::{Error, ErrorKind};
///
/// struct TransientIoOnly;
///
/// impl RetryPredicate<Error> for TransientIoOnly {
///     fn should_retry(&self, error: &Error) -> bool {
///         !matches!(
///             error.kind(),
///             ErrorKind::NotFound | ErrorKind::PermissionDenied | ErrorKind::InvalidInput
///         )
///     }
/// }
/// ```
pub trait RetryPredicate<E: ?Sized>: Send + Sync {
    /// Whether the given error should be retried
    fn should_retry(&self, error: &E) -> bool;
}

/// Retries every error
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysRetry;

impl<E: ?Sized> RetryPredicate<E> for AlwaysRetry {
    fn should_retry(&self, _error: &E) -> bool {
        true
    }
}

/// Retries nothing
#[derive(Debug, Clone, Copy)]
pub struct NeverRetry;

impl<E: ?Sized> RetryPredicate<E> for NeverRetry {
    fn should_retry(&self, _error: &E) -> bool {
        false
    }
}

/// A predicate backed by a closure
pub struct ClosurePredicate<F> {
    predicate: F,
}

impl<F> ClosurePredicate<F> {
    pub fn new(predicate: F) -> Self {
        Self { predicate }
    }
}

impl<E, F> RetryPredicate<E> for ClosurePredicate<F>
where
    F: Fn(&E) -> bool + Send + Sync,
{
    fn should_retry(&self, error: &E) -> bool {
        (self.predicate)(error)
    }
}

/// Retries only errors whose message matches one of a set of patterns
#[derive(Debug, Clone)]
pub struct MessagePredicate {
    retryable_patterns: Vec<String>,
}

impl MessagePredicate {
    /// Create a predicate with the given substring patterns
    pub fn new(patterns: Vec<String>) -> Self {
        Self {
            retryable_patterns: patterns,
        }
    }

    /// A predicate for common transient network errors
    pub fn network_errors() -> Self {
        Self::new(vec![
            "timeout".to_string(),
            "timed out".to_string(),
            "connection reset".to_string(),
            "connection refused".to_string(),
            "network unreachable".to_string(),
            "temporary failure".to_string(),
        ])
    }
}

impl<E: Error> RetryPredicate<E> for MessagePredicate {
    fn should_retry(&self, error: &E) -> bool {
        let message = error.to_string().to_lowercase();
        self.retryable_patterns
            .iter()
            .any(|pattern| message.contains(&pattern.to_lowercase()))
    }
}
