//! Batch job scenario
//!
//! The job runs to completion on its own: init (prestart), then main, then
//! cleanup (poststop). Once the allocation stops it must be `complete` and
//! every hook must have left its `-ran` marker and removed its `-running` one.

use lifecycle_core::domain::allocation::ClientStatus;

use crate::error::{ScenarioError, StepExt};
use crate::files::FileSet;
use crate::fixtures::Fixture;
use crate::suite::SuiteContext;
use crate::wait::{AllocTarget, wait_for_alloc_status};

/// Tasks of the batch job, in lifecycle order
pub const PHASES: [&str; 3] = ["init", "main", "cleanup"];

pub fn expected_files() -> FileSet {
    FileSet::completed_hooks(&PHASES)
}

pub async fn run(ctx: &SuiteContext, job_id: &str) -> Result<(), ScenarioError> {
    let alloc_id = super::submit_single(ctx, Fixture::Batch, job_id).await?;

    wait_for_alloc_status(ctx.cluster(), &alloc_id, AllocTarget::Stopped, ctx.wait_settings()).await?;

    // stopped is not enough, the allocation has to have succeeded
    let alloc = ctx
        .cluster()
        .allocation(&alloc_id)
        .await
        .step("fetch allocation")?;
    if alloc.client_status != ClientStatus::Complete {
        return Err(ScenarioError::Assertion(format!(
            "allocation {} finished as {} instead of complete (failed tasks: {:?})",
            alloc_id,
            alloc.client_status,
            alloc.failed_tasks()
        )));
    }

    super::verify_markers(ctx, &alloc_id, &expected_files()).await
}
