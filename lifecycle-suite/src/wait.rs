//! Wait helpers
//!
//! Blocking polls that return once the cluster reaches a target condition or
//! give up after the configured timeout. Server errors while polling are
//! logged and retried; the last observation ends up in the timeout error.
//! Requests the cluster rejects (4xx other than 404) end the wait at once.

use std::future::Future;
use std::time::Duration;

use lifecycle_client::ClientError;
use lifecycle_core::domain::allocation::{Allocation, AllocationListStub, ClientStatus};
use thiserror::Error;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::cluster::Cluster;
use crate::config::Config;

/// Timeout and poll interval shared by every wait helper
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitSettings {
    pub timeout: Duration,
    pub interval: Duration,
}

impl From<&Config> for WaitSettings {
    fn from(config: &Config) -> Self {
        Self {
            timeout: config.wait_timeout,
            interval: config.poll_interval,
        }
    }
}

/// Errors returned by the wait helpers
#[derive(Debug, Error)]
pub enum WaitError {
    /// The condition did not hold before the deadline
    #[error("timed out after {timeout:?} waiting for {what} (last observation: {last})")]
    Timeout {
        what: String,
        timeout: Duration,
        last: String,
    },

    /// The allocation stopped while it was expected to start running
    #[error("allocation {alloc_id} reached terminal status {status} while waiting for it to run")]
    AllocStopped {
        alloc_id: String,
        status: ClientStatus,
    },

    /// The cluster refused a request made while waiting
    #[error("request rejected while waiting for {what}: {source}")]
    Rejected {
        what: String,
        #[source]
        source: ClientError,
    },
}

/// Allocation condition to wait for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocTarget {
    /// Client status is `running`
    Running,
    /// Client status is terminal (`complete`, `failed` or `lost`)
    Stopped,
}

impl std::fmt::Display for AllocTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AllocTarget::Running => f.write_str("running"),
            AllocTarget::Stopped => f.write_str("stopped"),
        }
    }
}

/// Outcome of one poll
enum Probe<T> {
    Ready(T),
    NotYet(String),
    Abort(WaitError),
}

/// Polls `probe` every `settings.interval` until it is ready or the timeout expires
async fn poll_until<T, F, Fut>(settings: WaitSettings, what: &str, mut probe: F) -> Result<T, WaitError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Probe<T>>,
{
    let deadline = Instant::now() + settings.timeout;
    let mut ticker = time::interval(settings.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut last = String::from("nothing observed yet");

    loop {
        ticker.tick().await;

        // no probe may start once the deadline has passed
        if Instant::now() >= deadline {
            return Err(WaitError::Timeout {
                what: what.to_string(),
                timeout: settings.timeout,
                last,
            });
        }

        match time::timeout_at(deadline, probe()).await {
            Ok(Probe::Ready(value)) => return Ok(value),
            Ok(Probe::NotYet(observation)) => {
                debug!("Waiting for {}: {}", what, observation);
                last = observation;
            }
            Ok(Probe::Abort(err)) => return Err(err),
            Err(_) => last = "request still in flight at deadline".to_string(),
        }
    }
}

/// Retries transient API errors and gives up on rejected requests
fn api_error_probe<T>(what: &str, err: ClientError) -> Probe<T> {
    if err.is_client_error() && !err.is_not_found() {
        return Probe::Abort(WaitError::Rejected {
            what: what.to_string(),
            source: err,
        });
    }
    warn!("Error while waiting for {}: {}", what, err);
    Probe::NotYet(format!("last error: {}", err))
}

/// Blocks until the cluster has elected a leader
///
/// # Returns
/// The leader's RPC address
pub async fn wait_for_leader(cluster: &dyn Cluster, settings: WaitSettings) -> Result<String, WaitError> {
    let what = "cluster leader";
    let leader = poll_until(settings, what, move || async move {
        match cluster.leader().await {
            Ok(leader) if !leader.is_empty() => Probe::Ready(leader),
            Ok(_) => Probe::NotYet("no leader elected".to_string()),
            Err(e) => api_error_probe(what, e),
        }
    })
    .await?;

    info!("Cluster leader elected: {}", leader);
    Ok(leader)
}

/// Blocks until at least `min` client nodes are ready and eligible
///
/// # Returns
/// The number of ready nodes observed
pub async fn wait_for_nodes_ready(
    cluster: &dyn Cluster,
    min: usize,
    settings: WaitSettings,
) -> Result<usize, WaitError> {
    let what = format!("{} ready client node(s)", min);
    let ready = poll_until(settings, &what, || {
        let what = what.as_str();
        async move {
            match cluster.list_nodes().await {
                Ok(nodes) => {
                    let ready = nodes.iter().filter(|n| n.is_ready()).count();
                    if ready >= min {
                        Probe::Ready(ready)
                    } else {
                        Probe::NotYet(format!("{} of {} node(s) ready", ready, nodes.len()))
                    }
                }
                Err(e) => api_error_probe(what, e),
            }
        }
    })
    .await?;

    info!("{} client node(s) ready", ready);
    Ok(ready)
}

/// Blocks until the scheduler has placed at least one allocation for a job
pub async fn wait_for_allocs(
    cluster: &dyn Cluster,
    job_id: &str,
    settings: WaitSettings,
) -> Result<Vec<AllocationListStub>, WaitError> {
    let what = format!("allocations of job {}", job_id);
    poll_until(settings, &what, || {
        let what = what.as_str();
        async move {
            match cluster.job_allocations(job_id).await {
                Ok(allocs) if !allocs.is_empty() => Probe::Ready(allocs),
                Ok(_) => Probe::NotYet("no allocations placed".to_string()),
                Err(e) => api_error_probe(what, e),
            }
        }
    })
    .await
}

/// Blocks until an allocation reaches the target condition
///
/// Waiting for [`AllocTarget::Running`] fails fast with
/// [`WaitError::AllocStopped`] when the allocation stops first.
///
/// # Returns
/// The allocation as last observed
pub async fn wait_for_alloc_status(
    cluster: &dyn Cluster,
    alloc_id: &str,
    target: AllocTarget,
    settings: WaitSettings,
) -> Result<Allocation, WaitError> {
    let what = format!("allocation {} to be {}", alloc_id, target);
    let alloc = poll_until(settings, &what, || {
        let what = what.as_str();
        async move {
            let alloc = match cluster.allocation(alloc_id).await {
                Ok(alloc) => alloc,
                Err(e) => return api_error_probe(what, e),
            };

            let status = alloc.client_status;
            match target {
                AllocTarget::Running if status == ClientStatus::Running => Probe::Ready(alloc),
                AllocTarget::Running if status.is_terminal() => {
                    Probe::Abort(WaitError::AllocStopped {
                        alloc_id: alloc_id.to_string(),
                        status,
                    })
                }
                AllocTarget::Stopped if status.is_terminal() => Probe::Ready(alloc),
                _ => Probe::NotYet(format!("client status {}", status)),
            }
        }
    })
    .await?;

    info!("Allocation {} is {} ({})", alloc_id, target, alloc.client_status);
    Ok(alloc)
}
