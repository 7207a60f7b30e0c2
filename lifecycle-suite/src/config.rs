//! Harness configuration
//!
//! Defines the cluster connection settings and the knobs that control how long
//! and how often the harness polls the cluster.

use std::path::PathBuf;
use std::time::Duration;

/// Default agent address, matching the Nomad CLI
pub const DEFAULT_NOMAD_ADDR: &str = "http://127.0.0.1:4646";

/// Harness configuration
///
/// Wait timeouts are configurable so the suite can be tuned for a laptop
/// dev agent as well as a slow, freshly provisioned cluster.
#[derive(Debug, Clone)]
pub struct Config {
    /// Nomad agent base URL (e.g., "http://127.0.0.1:4646")
    pub nomad_addr: String,

    /// ACL token
    pub token: Option<String>,

    /// Namespace jobs are registered in
    pub namespace: Option<String>,

    /// Region jobs are registered in
    pub region: Option<String>,

    /// Upper bound for every wait helper
    pub wait_timeout: Duration,

    /// Delay between two polls of the same condition
    pub poll_interval: Duration,

    /// Client nodes that must be ready before any scenario runs
    pub min_ready_nodes: usize,

    /// Prefix of generated job IDs
    pub job_id_prefix: String,

    /// Directory holding `batch.nomad` and `service.nomad`; the embedded copies are used when unset
    pub inputs_dir: Option<PathBuf>,

    /// Run scenarios concurrently instead of one after another
    pub parallel: bool,

    /// Skip purging submitted jobs after the suite
    pub keep_jobs: bool,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new(nomad_addr: String) -> Self {
        Self {
            nomad_addr,
            token: None,
            namespace: None,
            region: None,
            wait_timeout: Duration::from_secs(120),
            poll_interval: Duration::from_millis(500),
            min_ready_nodes: 1,
            job_id_prefix: "lifecycle".to_string(),
            inputs_dir: None,
            parallel: false,
            keep_jobs: false,
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - NOMAD_ADDR (optional, default: http://127.0.0.1:4646)
    /// - NOMAD_TOKEN, NOMAD_NAMESPACE, NOMAD_REGION (optional)
    /// - LIFECYCLE_WAIT_TIMEOUT (optional, seconds, default: 120)
    /// - LIFECYCLE_POLL_INTERVAL_MS (optional, milliseconds, default: 500)
    /// - LIFECYCLE_MIN_READY_NODES (optional, default: 1)
    /// - LIFECYCLE_INPUTS_DIR (optional)
    pub fn from_env() -> anyhow::Result<Self> {
        let nomad_addr =
            std::env::var("NOMAD_ADDR").unwrap_or_else(|_| DEFAULT_NOMAD_ADDR.to_string());

        let mut config = Self::new(nomad_addr);

        config.token = non_empty_var("NOMAD_TOKEN");
        config.namespace = non_empty_var("NOMAD_NAMESPACE");
        config.region = non_empty_var("NOMAD_REGION");

        if let Some(secs) = parse_var::<u64>("LIFECYCLE_WAIT_TIMEOUT")? {
            config.wait_timeout = Duration::from_secs(secs);
        }
        if let Some(ms) = parse_var::<u64>("LIFECYCLE_POLL_INTERVAL_MS")? {
            config.poll_interval = Duration::from_millis(ms);
        }
        if let Some(n) = parse_var::<usize>("LIFECYCLE_MIN_READY_NODES")? {
            config.min_ready_nodes = n;
        }
        config.inputs_dir = non_empty_var("LIFECYCLE_INPUTS_DIR").map(PathBuf::from);

        Ok(config)
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.nomad_addr.is_empty() {
            anyhow::bail!("nomad_addr cannot be empty");
        }

        if !self.nomad_addr.starts_with("http://") && !self.nomad_addr.starts_with("https://") {
            anyhow::bail!("nomad_addr must start with http:// or https://");
        }

        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        if self.wait_timeout < self.poll_interval {
            anyhow::bail!("wait_timeout must be at least one poll_interval");
        }

        if self.min_ready_nodes == 0 {
            anyhow::bail!("min_ready_nodes must be greater than 0");
        }

        if self.job_id_prefix.is_empty() {
            anyhow::bail!("job_id_prefix cannot be empty");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_NOMAD_ADDR.to_string())
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn parse_var<T: std::str::FromStr>(name: &str) -> anyhow::Result<Option<T>> {
    match non_empty_var(name) {
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|_| anyhow::anyhow!("{} has an invalid value: {:?}", name, raw)),
        None => Ok(None),
    }
}
