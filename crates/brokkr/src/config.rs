//! Policy file loading
//!
//! A policy file is a YAML document with a `default` policy and an
//! `operations` map of named overrides:
//!
//! ```yaml
//! default:
//!   max-attempts: 3
//!   initial-delay-ms: 500
//! operations:
//!   download:
//!     max-attempts: 5
//!     max-delay-ms: 30000
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

use crate::error::{Error, Result};
use crate::policy::{RetryPoliciesConfig, RetryPolicy};

/// Policy file names to search for
const CONFIG_FILE_NAMES: &[&str] = &["brokkr.yaml", "brokkr.yml"];

/// Loaded and validated retry policies
#[derive(Debug, Clone)]
pub struct PolicySet {
    /// The parsed policies
    pub policies: RetryPoliciesConfig,

    /// Path to the policy file
    pub config_path: Utf8PathBuf,
}

impl PolicySet {
    /// Load policies from the specified path, or search for a policy file
    /// in the working directory.
    pub fn load(path: Option<&Utf8Path>) -> Result<Self> {
        let (config_path, content) = if let Some(p) = path {
            let content = fs::read_to_string(p).map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::config_not_found(p.as_str())
                } else {
                    Error::Io(e)
                }
            })?;
            (p.to_owned(), content)
        } else {
            Self::find_config()?
        };

        let policies: RetryPoliciesConfig = serde_yaml_ng::from_str(&content)?;

        policies.default.validate("default")?;
        for (name, policy) in &policies.operations {
            policy.validate(name)?;
        }

        tracing::debug!(
            path = %config_path,
            operations = policies.operations.len(),
            "loaded retry policies"
        );

        Ok(Self {
            policies,
            config_path,
        })
    }

    fn find_config() -> Result<(Utf8PathBuf, String)> {
        for name in CONFIG_FILE_NAMES {
            let candidate = Utf8PathBuf::from(*name);
            if candidate.exists() {
                let content = fs::read_to_string(&candidate)?;
                return Ok((candidate, content));
            }
        }
        Err(Error::config_not_found(CONFIG_FILE_NAMES.join(" or ")))
    }

    /// The policy for an operation: its named override, or the default
    pub fn policy_for(&self, operation: &str) -> &RetryPolicy {
        self.policies
            .operations
            .get(operation)
            .unwrap_or(&self.policies.default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::BackoffStrategy;
    use std::io::Write;

    fn write_policy_file(dir: &tempfile::TempDir, content: &str) -> Utf8PathBuf {
        let path = dir.path().join("brokkr.yaml");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        Utf8PathBuf::from_path_buf(path).unwrap()
    }

    #[test]
    fn loads_default_and_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_policy_file(
            &dir,
            r#"
default:
  max-attempts: 5
  initial-delay-ms: 50
operations:
  upload:
    max-attempts: 2
    strategy: fixed-delay
"#,
        );

        let set = PolicySet::load(Some(&path)).unwrap();

        assert_eq!(set.policies.default.max_attempts, 5);
        assert_eq!(set.policies.default.initial_delay_ms, 50);

        let upload = set.policy_for("upload");
        assert_eq!(upload.max_attempts, 2);
        assert_eq!(upload.strategy, BackoffStrategy::FixedDelay);
    }

    #[test]
    fn unknown_operation_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_policy_file(&dir, "default:\n  max-attempts: 7\n");

        let set = PolicySet::load(Some(&path)).unwrap();
        assert_eq!(set.policy_for("no-such-operation").max_attempts, 7);
    }

    #[test]
    fn empty_document_yields_all_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_policy_file(&dir, "{}\n");

        let set = PolicySet::load(Some(&path)).unwrap();
        assert_eq!(set.policy_for("anything").max_attempts, 3);
        assert_eq!(set.policy_for("anything").initial_delay_ms, 500);
    }

    #[test]
    fn missing_file_reports_config_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path =
            Utf8PathBuf::from_path_buf(dir.path().join("does-not-exist.yaml")).unwrap();

        let err = PolicySet::load(Some(&path)).unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound { .. }));
    }

    #[test]
    fn invalid_multiplier_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_policy_file(
            &dir,
            r#"
operations:
  flaky:
    backoff-multiplier: -1.0
"#,
        );

        let err = PolicySet::load(Some(&path)).unwrap_err();
        assert!(matches!(err, Error::InvalidPolicy { .. }));
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_policy_file(&dir, "default: [not, a, mapping\n");

        let err = PolicySet::load(Some(&path)).unwrap_err();
        assert!(matches!(err, Error::YamlParse(_)));
    }
}
