//! Service job scenario

use tracing::info;

use crate::error::{ScenarioError, StepExt};
use crate::files::FileSet;
use crate::fixtures::Fixture;
use crate::suite::SuiteContext;
use crate::wait::{AllocTarget, wait_for_alloc_status};

/// Tasks of the service job, in lifecycle order
pub const PHASES: [&str; 4] = ["init", "sidecar", "main", "cleanup"];

pub fn expected_files() -> FileSet {
    FileSet::completed_hooks(&PHASES)
}

/// Runs the service job until it is healthy, stops it and checks that every
/// hook, the poststop one included, ran to completion
pub async fn run(ctx: &SuiteContext, job_id: &str) -> Result<(), ScenarioError> {
    let alloc_id = super::submit_single(ctx, Fixture::Service, job_id).await?;

    wait_for_alloc_status(ctx.cluster(), &alloc_id, AllocTarget::Running, ctx.wait_settings()).await?;

    let alloc = ctx
        .cluster()
        .allocation(&alloc_id)
        .await
        .step("fetch allocation")?;
    info!("Allocation {} running on node {}", alloc.id, alloc.node_id);

    ctx.cluster()
        .deregister_job(job_id, false)
        .await
        .step("deregister job")?;
    info!("Stopped job {}", job_id);

    wait_for_alloc_status(ctx.cluster(), &alloc_id, AllocTarget::Stopped, ctx.wait_settings()).await?;

    super::verify_markers(ctx, &alloc_id, &expected_files()).await
}
