//! Retry execution engine
//!
//! The executor re-invokes an async operation until it succeeds, a predicate
//! vetoes the error, or the attempt limit is exhausted. Attempts never
//! overlap: each one resolves fully before the next begins, and the caller's
//! task suspends during inter-attempt delays.
//!
//! On final failure the caller receives the error from the last attempt,
//! unchanged. Earlier errors are not retained; they are visible only through
//! the configured observer.

use std::error::Error;
use std::future::Future;
use std::time::Instant;

use crate::observer::{NoOpObserver, RetryObserver};
use crate::policy::RetryPolicy;
use crate::strategies::{calculate_delay, AlwaysRetry, RetryPredicate};

/// Execute an operation with the default policy.
///
/// Defaults: 3 attempts, 500 ms base delay, exponential backoff with
/// multiplier 2, jitter enabled, every error retried.
///
/// # Example
///
/// ```rust,no_run
/// use brokkr::retry;
///
/// async fn example() -> Result<String, std::io::Error> {
///     retry(|| async {
///         // Your fallible operation here
///         Ok("success".to_string())
///     })
///     .await
/// }
/// ```
pub async fn retry<F, Fut, T, E>(op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Error + Send + 'static,
{
    RetryExecutorBuilder::new().build().execute(op).await
}

/// Execute an operation with retry logic based on a policy.
///
/// This is the convenience form for callers that only need a policy. For
/// predicates or observers, use `RetryExecutorBuilder`.
pub async fn retry_with_policy<F, Fut, T, E>(policy: &RetryPolicy, op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Error + Send + 'static,
{
    RetryExecutorBuilder::new()
        .with_policy(policy.clone())
        .build()
        .execute(op)
        .await
}

/// Builder for configuring a `RetryExecutor`
///
/// # Example
///
/// ```rust
/// use brokkr::{RetryExecutorBuilder, RetryPolicy, TracingObserver};
///
/// let executor = RetryExecutorBuilder::new()
///     .with_policy(RetryPolicy::default())
///     .with_observer(TracingObserver::new("download"))
///     .with_jitter(false)
///     .build();
/// ```
pub struct RetryExecutorBuilder<P = AlwaysRetry, O = NoOpObserver> {
    policy: RetryPolicy,
    predicate: P,
    observer: O,
}

impl Default for RetryExecutorBuilder<AlwaysRetry, NoOpObserver> {
    fn default() -> Self {
        Self::new()
    }
}

impl RetryExecutorBuilder<AlwaysRetry, NoOpObserver> {
    pub fn new() -> Self {
        Self {
            policy: RetryPolicy::default(),
            predicate: AlwaysRetry,
            observer: NoOpObserver,
        }
    }
}

impl<P, O> RetryExecutorBuilder<P, O> {
    /// Set the retry policy
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the predicate deciding which errors are retried
    pub fn with_predicate<P2>(self, predicate: P2) -> RetryExecutorBuilder<P2, O> {
        RetryExecutorBuilder {
            policy: self.policy,
            predicate,
            observer: self.observer,
        }
    }

    /// Set the observer receiving attempt callbacks
    pub fn with_observer<O2>(self, observer: O2) -> RetryExecutorBuilder<P, O2> {
        RetryExecutorBuilder {
            policy: self.policy,
            predicate: self.predicate,
            observer,
        }
    }

    /// Override the policy's jitter flag.
    ///
    /// Call this after `with_policy`; setting a policy replaces the flag.
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.policy.jitter = jitter;
        self
    }

    /// Build the executor
    pub fn build(self) -> RetryExecutor<P, O> {
        RetryExecutor {
            policy: self.policy,
            predicate: self.predicate,
            observer: self.observer,
        }
    }
}

/// A retry executor with a policy, predicate, and observer.
///
/// Use `RetryExecutorBuilder` to create one. An executor holds no per-call
/// state and can be shared across tasks; concurrent `execute` calls are
/// fully independent.
pub struct RetryExecutor<P, O> {
    policy: RetryPolicy,
    predicate: P,
    observer: O,
}

impl<P, O> RetryExecutor<P, O>
where
    O: RetryObserver,
{
    /// Execute an operation, retrying failures per the configured policy.
    ///
    /// Returns the first successful result, or the error of the last
    /// attempt once retries are exhausted or vetoed. A `max_attempts` of 0
    /// is treated as 1: the operation always runs at least once.
    pub async fn execute<F, Fut, T, E>(&self, mut op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Error + Send + 'static,
        P: RetryPredicate<E>,
    {
        let start = Instant::now();
        let max_attempts = self.policy.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            self.observer.on_attempt_start(attempt, max_attempts);

            match op().await {
                Ok(result) => {
                    self.observer.on_success(attempt, start.elapsed());
                    return Ok(result);
                }
                Err(err) => {
                    if !self.predicate.should_retry(&err) {
                        self.observer.on_cancelled(attempt, Some(&err));
                        return Err(err);
                    }

                    if attempt >= max_attempts {
                        self.observer.on_exhausted(attempt, &err);
                        return Err(err);
                    }

                    let delay = calculate_delay(&self.policy, attempt, self.policy.jitter);
                    self.observer.on_attempt_failed(attempt, &err, delay);

                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        unreachable!("the final attempt either returns its result or propagates its error")
    }
}
