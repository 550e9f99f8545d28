//! Retry policy types
//!
//! A `RetryPolicy` is a plain configuration record: attempt limit, delay
//! parameters, backoff strategy, and jitter flag. Policies deserialize from
//! kebab-case YAML with every field defaulted, so `{}` is a valid policy.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{Error, Result};

/// Retry policy for an operation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Backoff strategy
    #[serde(default)]
    pub strategy: BackoffStrategy,

    /// Multiplier applied per attempt under exponential backoff
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Base delay in milliseconds before the second attempt
    #[serde(default = "default_initial_delay")]
    pub initial_delay_ms: u64,

    /// Optional cap on the nominal delay, applied before jitter
    #[serde(default)]
    pub max_delay_ms: Option<u64>,

    /// Randomize each realized wait within [0.8, 1.2) of the nominal delay
    #[serde(default = "default_jitter")]
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            strategy: BackoffStrategy::default(),
            backoff_multiplier: default_backoff_multiplier(),
            initial_delay_ms: default_initial_delay(),
            max_delay_ms: None,
            jitter: default_jitter(),
        }
    }
}

impl RetryPolicy {
    /// Check the policy for values that cannot be executed.
    ///
    /// A `max_attempts` of 0 is allowed here: the executor always makes at
    /// least one attempt.
    pub fn validate(&self, name: &str) -> Result<()> {
        if self.backoff_multiplier <= 0.0 {
            return Err(Error::invalid_policy(
                name,
                format!(
                    "backoff-multiplier must be positive, got {}",
                    self.backoff_multiplier
                ),
            ));
        }
        if self.max_attempts == 0 {
            tracing::warn!(
                policy = name,
                "max-attempts is 0; the executor will still attempt once"
            );
        }
        Ok(())
    }
}

fn default_max_attempts() -> u32 {
    3
}
fn default_backoff_multiplier() -> f64 {
    2.0
}
fn default_initial_delay() -> u64 {
    500
}
fn default_jitter() -> bool {
    true
}

/// Backoff strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum BackoffStrategy {
    /// No delay between attempts
    None,

    /// Constant delay between attempts
    FixedDelay,

    /// Delay multiplied per attempt (default)
    #[default]
    ExponentialBackoff,

    /// Delay grows by the base delay per attempt
    LinearBackoff,
}

/// A default policy plus named per-operation overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RetryPoliciesConfig {
    /// Policy used when an operation has no override
    #[serde(default)]
    pub default: RetryPolicy,

    /// Per-operation retry policies
    #[serde(default)]
    pub operations: HashMap<String, RetryPolicy>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.strategy, BackoffStrategy::ExponentialBackoff);
        assert_eq!(policy.backoff_multiplier, 2.0);
        assert_eq!(policy.initial_delay_ms, 500);
        assert_eq!(policy.max_delay_ms, None);
        assert!(policy.jitter);
    }

    #[test]
    fn empty_document_deserializes_to_defaults() {
        let policy: RetryPolicy = serde_yaml_ng::from_str("{}").unwrap();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.initial_delay_ms, 500);
        assert!(policy.jitter);
    }

    #[test]
    fn kebab_case_keys_round_trip() {
        let policy = RetryPolicy {
            max_attempts: 5,
            strategy: BackoffStrategy::FixedDelay,
            backoff_multiplier: 1.5,
            initial_delay_ms: 250,
            max_delay_ms: Some(4000),
            jitter: false,
        };

        let yaml = serde_yaml_ng::to_string(&policy).unwrap();
        assert!(yaml.contains("max-attempts: 5"));
        assert!(yaml.contains("strategy: fixed-delay"));
        assert!(yaml.contains("max-delay-ms: 4000"));

        let back: RetryPolicy = serde_yaml_ng::from_str(&yaml).unwrap();
        assert_eq!(back.max_attempts, 5);
        assert_eq!(back.strategy, BackoffStrategy::FixedDelay);
        assert_eq!(back.max_delay_ms, Some(4000));
        assert!(!back.jitter);
    }

    #[test]
    fn validate_rejects_non_positive_multiplier() {
        let policy = RetryPolicy {
            backoff_multiplier: 0.0,
            ..RetryPolicy::default()
        };
        assert!(policy.validate("default").is_err());

        let policy = RetryPolicy {
            backoff_multiplier: -2.0,
            ..RetryPolicy::default()
        };
        assert!(policy.validate("default").is_err());
    }

    #[test]
    fn validate_allows_zero_attempts() {
        let policy = RetryPolicy {
            max_attempts: 0,
            ..RetryPolicy::default()
        };
        assert!(policy.validate("default").is_ok());
    }

    #[test]
    fn policies_config_default_has_no_overrides() {
        let config = RetryPoliciesConfig::default();
        assert!(config.operations.is_empty());
        assert_eq!(config.default.max_attempts, 3);
    }
}
