//! Error types for the lifecycle suite

use std::fmt::Debug;
use std::path::PathBuf;

use lifecycle_client::ClientError;
use thiserror::Error;

use crate::wait::WaitError;

/// Why a scenario did not pass
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// A cluster API call failed; never retried
    #[error("{step} failed: {source}")]
    Api {
        step: &'static str,
        #[source]
        source: ClientError,
    },

    /// A wait helper gave up
    #[error(transparent)]
    Wait(#[from] WaitError),

    /// A job file override could not be read
    #[error("failed to read job file {}: {source}", path.display())]
    Fixture {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The cluster behaved, but not the way the scenario expects
    #[error("assertion failed: {0}")]
    Assertion(String),

    /// The task running the scenario panicked or was cancelled
    #[error("scenario aborted: {0}")]
    Aborted(String),
}

impl ScenarioError {
    /// Fatal errors mean the scenario could not observe the cluster at all,
    /// as opposed to observing the wrong thing
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ScenarioError::Assertion(_))
    }
}

/// Errors that stop the suite before any scenario runs
#[derive(Debug, Error)]
pub enum SuiteError {
    #[error("cluster is not ready: {0}")]
    Setup(#[from] WaitError),
}

/// Names the step of an API call when it fails
pub(crate) trait StepExt<T> {
    fn step(self, step: &'static str) -> Result<T, ScenarioError>;
}

impl<T> StepExt<T> for lifecycle_client::Result<T> {
    fn step(self, step: &'static str) -> Result<T, ScenarioError> {
        self.map_err(|source| ScenarioError::Api { step, source })
    }
}

/// Fails with an assertion error unless `expected == actual`
pub(crate) fn ensure_eq<T: PartialEq + Debug>(
    what: &str,
    expected: T,
    actual: T,
) -> Result<(), ScenarioError> {
    if expected == actual {
        return Ok(());
    }
    Err(ScenarioError::Assertion(format!(
        "{}: expected {:?}, got {:?}",
        what, expected, actual
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_only_assertions_are_non_fatal() {
        assert!(!ScenarioError::Assertion("x".into()).is_fatal());
        assert!(
            ScenarioError::Api {
                step: "register job",
                source: ClientError::api_error(500, "boom"),
            }
            .is_fatal()
        );
        assert!(
            ScenarioError::Wait(WaitError::Timeout {
                what: "cluster leader".into(),
                timeout: Duration::from_secs(1),
                last: "no leader elected".into(),
            })
            .is_fatal()
        );
    }

    #[test]
    fn test_step_names_the_failed_call() {
        let result: lifecycle_client::Result<()> = Err(ClientError::api_error(403, "Permission denied"));
        let err = result.step("deregister job").unwrap_err();
        assert_eq!(
            err.to_string(),
            "deregister job failed: API error (status 403): Permission denied"
        );
    }

    #[test]
    fn test_ensure_eq() {
        assert!(ensure_eq("allocation count", 1, 1).is_ok());
        let err = ensure_eq("allocation count", 1, 2).unwrap_err();
        assert_eq!(
            err.to_string(),
            "assertion failed: allocation count: expected 1, got 2"
        );
    }
}
