//! Suite runner
//!
//! A [`Suite`] checks that the cluster can take work, runs each selected
//! scenario with its own job ID and finally purges every job it submitted.
//! All state shared between scenarios lives in the [`SuiteContext`].

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::cluster::Cluster;
use crate::config::Config;
use crate::error::{ScenarioError, SuiteError};
use crate::report::{ScenarioOutcome, SuiteReport};
use crate::scenario::Scenario;
use crate::wait::{self, WaitSettings};

/// Generates a job ID of the form `<prefix>-xxxxxxxx`
pub fn generate_job_id(prefix: &str) -> String {
    let uuid = Uuid::new_v4().to_string();
    format!("{}-{}", prefix, &uuid[..8])
}

/// Everything a scenario needs, plus the IDs of the jobs submitted so far
pub struct SuiteContext {
    cluster: Arc<dyn Cluster>,
    config: Config,
    job_ids: Mutex<Vec<String>>,
}

impl SuiteContext {
    pub fn new(cluster: Arc<dyn Cluster>, config: Config) -> Self {
        Self {
            cluster,
            config,
            job_ids: Mutex::new(Vec::new()),
        }
    }

    pub fn cluster(&self) -> &dyn Cluster {
        self.cluster.as_ref()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn wait_settings(&self) -> WaitSettings {
        WaitSettings::from(&self.config)
    }

    /// Generates a fresh job ID and records it for teardown
    pub fn new_job_id(&self) -> String {
        let job_id = generate_job_id(&self.config.job_id_prefix);
        self.job_ids
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(job_id.clone());
        job_id
    }

    /// IDs handed out so far, in order
    pub fn job_ids(&self) -> Vec<String> {
        self.job_ids
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// A set of scenarios run against one cluster
pub struct Suite {
    ctx: Arc<SuiteContext>,
    scenarios: Vec<Scenario>,
}

impl Suite {
    /// Creates a suite; duplicate scenarios are dropped, order is kept
    pub fn new(ctx: SuiteContext, scenarios: Vec<Scenario>) -> Self {
        let mut unique = Vec::with_capacity(scenarios.len());
        for scenario in scenarios {
            if !unique.contains(&scenario) {
                unique.push(scenario);
            }
        }

        Self {
            ctx: Arc::new(ctx),
            scenarios: unique,
        }
    }

    pub fn context(&self) -> &SuiteContext {
        &self.ctx
    }

    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    /// Runs setup, every scenario and teardown
    ///
    /// Scenario failures end up in the report; only a cluster that never
    /// becomes ready is an error.
    pub async fn run(&self) -> Result<SuiteReport, SuiteError> {
        self.before_all().await?;

        let outcomes = if self.ctx.config().parallel {
            self.run_parallel().await
        } else {
            self.run_sequential().await
        };

        if self.ctx.config().keep_jobs {
            info!("Keeping submitted jobs: {:?}", self.ctx.job_ids());
        } else {
            self.teardown().await;
        }

        Ok(SuiteReport::new(outcomes))
    }

    /// Waits for a leader and enough ready client nodes
    pub async fn before_all(&self) -> Result<(), SuiteError> {
        let settings = self.ctx.wait_settings();
        wait::wait_for_leader(self.ctx.cluster(), settings).await?;
        wait::wait_for_nodes_ready(self.ctx.cluster(), self.ctx.config().min_ready_nodes, settings)
            .await?;
        Ok(())
    }

    /// Purges every job the suite submitted and garbage collects
    ///
    /// Failures are logged and otherwise ignored.
    pub async fn teardown(&self) {
        let job_ids = self.ctx.job_ids();
        info!("Purging {} job(s)", job_ids.len());

        for job_id in &job_ids {
            match self.ctx.cluster().deregister_job(job_id, true).await {
                Ok(_) => info!("Purged job {}", job_id),
                Err(e) if e.is_not_found() => info!("Job {} was never registered", job_id),
                Err(e) => warn!("Failed to purge job {}: {}", job_id, e),
            }
        }

        if let Err(e) = self.ctx.cluster().garbage_collect().await {
            warn!("Failed to garbage collect: {}", e);
        }
    }

    async fn run_sequential(&self) -> Vec<ScenarioOutcome> {
        let mut outcomes = Vec::with_capacity(self.scenarios.len());
        for &scenario in &self.scenarios {
            outcomes.push(run_scenario(Arc::clone(&self.ctx), scenario).await);
        }
        outcomes
    }

    async fn run_parallel(&self) -> Vec<ScenarioOutcome> {
        let handles: Vec<_> = self
            .scenarios
            .iter()
            .map(|&scenario| {
                let ctx = Arc::clone(&self.ctx);
                (scenario, tokio::spawn(run_scenario(ctx, scenario)))
            })
            .collect();

        let mut outcomes = Vec::with_capacity(handles.len());
        for (scenario, handle) in handles {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!("Scenario {} task failed: {}", scenario, e);
                    ScenarioOutcome::aborted(scenario, ScenarioError::Aborted(e.to_string()))
                }
            };
            outcomes.push(outcome);
        }
        outcomes
    }
}

async fn run_scenario(ctx: Arc<SuiteContext>, scenario: Scenario) -> ScenarioOutcome {
    let job_id = ctx.new_job_id();
    info!("Running scenario {} as job {}", scenario, job_id);

    let started = Instant::now();
    let result = scenario.run(&ctx, &job_id).await;
    let elapsed = started.elapsed();

    match &result {
        Ok(()) => info!("Scenario {} passed in {:?}", scenario, elapsed),
        Err(e) if e.is_fatal() => error!("Scenario {} aborted: {}", scenario, e),
        Err(e) => warn!("Scenario {} failed: {}", scenario, e),
    }

    ScenarioOutcome::new(scenario, Some(job_id), elapsed, result)
}
