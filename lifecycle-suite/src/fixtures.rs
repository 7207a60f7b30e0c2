//! Job files submitted by the scenarios
//!
//! Both job files ship inside the binary. A directory override lets the suite
//! run edited copies (another driver, datacenter or image) without a rebuild.

use std::borrow::Cow;
use std::path::Path;

use tracing::debug;

use crate::error::ScenarioError;

const BATCH_JOB: &str = include_str!("../inputs/batch.nomad");
const SERVICE_JOB: &str = include_str!("../inputs/service.nomad");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fixture {
    /// Batch job with prestart and poststop hooks
    Batch,
    /// Service job with prestart, sidecar and poststop hooks
    Service,
}

impl Fixture {
    pub fn file_name(self) -> &'static str {
        match self {
            Fixture::Batch => "batch.nomad",
            Fixture::Service => "service.nomad",
        }
    }

    pub fn embedded(self) -> &'static str {
        match self {
            Fixture::Batch => BATCH_JOB,
            Fixture::Service => SERVICE_JOB,
        }
    }

    /// Job file contents, read from `inputs_dir` when one is given
    pub fn load(self, inputs_dir: Option<&Path>) -> Result<Cow<'static, str>, ScenarioError> {
        let Some(dir) = inputs_dir else {
            return Ok(Cow::Borrowed(self.embedded()));
        };

        let path = dir.join(self.file_name());
        debug!("Reading job file {}", path.display());
        std::fs::read_to_string(&path)
            .map(Cow::Owned)
            .map_err(|source| ScenarioError::Fixture { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Collapses the column alignment of formatted HCL
    fn normalized(hcl: &str) -> String {
        hcl.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_embedded_jobs_wire_lifecycle_hooks() {
        let batch = normalized(Fixture::Batch.embedded());
        assert!(batch.contains("type = \"batch\""));
        assert!(batch.contains("hook = \"prestart\""));
        assert!(batch.contains("hook = \"poststop\""));

        let service = normalized(Fixture::Service.embedded());
        assert!(service.contains("type = \"service\""));
        assert!(service.contains("sidecar = true"));
        assert!(service.contains("hook = \"poststop\""));
    }

    #[test]
    fn test_load_without_override_is_embedded() {
        let job = Fixture::Service.load(None).unwrap();
        assert!(matches!(job, Cow::Borrowed(_)));
    }

    #[test]
    fn test_load_from_directory() {
        let dir = std::env::temp_dir().join(format!("lifecycle-inputs-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("batch.nomad"), "job \"edited\" {}").unwrap();

        let job = Fixture::Batch.load(Some(&dir)).unwrap();
        assert_eq!(job, "job \"edited\" {}");

        let err = Fixture::Service.load(Some(&dir)).unwrap_err();
        assert!(matches!(err, ScenarioError::Fixture { .. }));
        assert!(err.is_fatal());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
