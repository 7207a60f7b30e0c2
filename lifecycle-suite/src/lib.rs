//! Lifecycle Suite
//!
//! End-to-end checks of task lifecycle hooks on a running Nomad cluster.
//!
//! Architecture:
//! - Configuration: cluster address, credentials and wait tuning
//! - Cluster: the trait the suite talks through, implemented by the HTTP client
//! - Wait helpers: polls for leader, ready nodes, placement and allocation status
//! - Scenarios: the batch and service lifecycle checks
//! - Suite: setup, scenario execution, teardown and the final report
//!
//! Each scenario submits a job whose prestart, main, sidecar and poststop tasks
//! write marker files into the shared allocation directory, waits for the
//! allocation to finish and compares the markers it finds with the ones it
//! expects.

pub mod cluster;
pub mod config;
pub mod error;
pub mod files;
pub mod fixtures;
pub mod report;
pub mod scenario;
pub mod suite;
pub mod wait;

#[cfg(test)]
pub(crate) mod testing;

pub use cluster::{Cluster, connect};
pub use config::Config;
pub use error::{ScenarioError, SuiteError};
pub use files::FileSet;
pub use report::{ScenarioOutcome, SuiteReport};
pub use scenario::Scenario;
pub use suite::{Suite, SuiteContext};
