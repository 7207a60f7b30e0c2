//! Lifecycle scenarios
//!
//! Each scenario submits one job file, follows its single allocation through
//! the lifecycle and then checks the marker files its hooks left behind.

pub mod batch;
pub mod service;

use lifecycle_core::domain::allocation::AllocationListStub;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{ScenarioError, StepExt, ensure_eq};
use crate::files::FileSet;
use crate::fixtures::Fixture;
use crate::suite::SuiteContext;
use crate::wait;

/// Allocation directory shared by all tasks of a group
pub const ALLOC_DIR: &str = "alloc";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    /// Batch job with prestart and poststop hooks
    Batch,
    /// Service job with prestart, sidecar and poststop hooks, stopped by the suite
    Service,
}

impl Scenario {
    pub const ALL: [Scenario; 2] = [Scenario::Batch, Scenario::Service];

    pub fn name(self) -> &'static str {
        match self {
            Scenario::Batch => "batch",
            Scenario::Service => "service",
        }
    }

    pub fn fixture(self) -> Fixture {
        match self {
            Scenario::Batch => Fixture::Batch,
            Scenario::Service => Fixture::Service,
        }
    }

    /// Marker files expected in the allocation directory once the job stopped
    pub fn expected_files(self) -> FileSet {
        match self {
            Scenario::Batch => batch::expected_files(),
            Scenario::Service => service::expected_files(),
        }
    }

    /// Runs the scenario under `job_id`
    pub async fn run(self, ctx: &SuiteContext, job_id: &str) -> Result<(), ScenarioError> {
        match self {
            Scenario::Batch => batch::run(ctx, job_id).await,
            Scenario::Service => service::run(ctx, job_id).await,
        }
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Parses and registers a job file under `job_id`, then waits for placement
///
/// # Returns
/// The allocations the scheduler created for the job
pub async fn register_and_wait_for_allocs(
    ctx: &SuiteContext,
    fixture: Fixture,
    job_id: &str,
) -> Result<Vec<AllocationListStub>, ScenarioError> {
    let hcl = fixture.load(ctx.config().inputs_dir.as_deref())?;

    let mut job = ctx
        .cluster()
        .parse_job(&hcl)
        .await
        .step("parse job")?
        .with_id(job_id);
    // the parsed job names a namespace, which wins over the query parameter
    if let Some(namespace) = &ctx.config().namespace {
        job = job.with_namespace(namespace.clone());
    }

    let ack = ctx
        .cluster()
        .register_job(&job)
        .await
        .step("register job")?;

    info!("Registered job {} (evaluation {})", job_id, ack.eval_id);
    if !ack.warnings.is_empty() {
        debug!("Registration warnings for {}: {}", job_id, ack.warnings);
    }

    let allocs = wait::wait_for_allocs(ctx.cluster(), job_id, ctx.wait_settings()).await?;
    Ok(allocs)
}

/// Submits a job that must produce exactly one allocation
///
/// # Returns
/// The allocation ID
async fn submit_single(
    ctx: &SuiteContext,
    fixture: Fixture,
    job_id: &str,
) -> Result<String, ScenarioError> {
    let allocs = register_and_wait_for_allocs(ctx, fixture, job_id).await?;
    ensure_eq("allocation count", 1, allocs.len())?;

    let alloc_id = allocs[0].id.clone();
    info!("Job {} placed allocation {}", job_id, alloc_id);
    Ok(alloc_id)
}

/// Lists the allocation directory and compares it with the expected markers
async fn verify_markers(
    ctx: &SuiteContext,
    alloc_id: &str,
    expected: &FileSet,
) -> Result<(), ScenarioError> {
    let listing = ctx
        .cluster()
        .list_alloc_files(alloc_id, ALLOC_DIR)
        .await
        .step("list allocation files")?;

    let observed = expected.observe(&listing);
    if observed == *expected {
        info!("Allocation {} has the expected marker files", alloc_id);
        return Ok(());
    }

    let mismatches: Vec<String> = expected
        .mismatches(&observed)
        .iter()
        .map(ToString::to_string)
        .collect();

    Err(ScenarioError::Assertion(format!(
        "marker files of allocation {} differ: {}",
        alloc_id,
        mismatches.join("; ")
    )))
}
