//! # brokkr
//!
//! Policy-driven retry execution for async operations:
//! - Bounded attempts with Fixed, Exponential (default), or Linear backoff
//! - Multiplicative jitter over a uniform [0.8, 1.2) factor
//! - Observable attempts via the `RetryObserver` trait, with a built-in
//!   `TracingObserver` for logging
//! - Retry predicates to short-circuit on permanent errors
//! - YAML policy files with named per-operation overrides
//!
//! The final error of an exhausted retry is the operation's own error from
//! the last attempt, propagated unchanged.
//!
//! # Example
//!
//! ```rust,no_run
//! use brokkr::{retry_with_policy, RetryPolicy};
//!
//! async fn example() -> Result<String, std::io::Error> {
//!     let policy = RetryPolicy::default();
//!
//!     retry_with_policy(&policy, || async {
//!         // Your fallible operation here
//!         Ok("success".to_string())
//!     })
//!     .await
//! }
//! ```

pub mod config;
pub mod error;
pub mod executor;
pub mod observer;
pub mod policy;
pub mod strategies;

pub use config::PolicySet;
pub use error::{Error, Result};
pub use executor::{retry, retry_with_policy, RetryExecutor, RetryExecutorBuilder};
pub use observer::{CountingObserver, FnObserver, NoOpObserver, RetryObserver, TracingObserver};
pub use policy::{BackoffStrategy, RetryPoliciesConfig, RetryPolicy};
pub use strategies::{
    calculate_delay, AlwaysRetry, ClosurePredicate, MessagePredicate, NeverRetry, RetryPredicate,
};
