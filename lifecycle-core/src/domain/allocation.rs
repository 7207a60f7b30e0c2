//! Allocation domain types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Client-side status of an allocation as reported by the node running it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientStatus {
    Pending,
    Running,
    Complete,
    Failed,
    Lost,
    #[serde(other)]
    Unknown,
}

impl ClientStatus {
    /// Whether the allocation has stopped for good
    ///
    /// Complete, failed and lost allocations never run again.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ClientStatus::Complete | ClientStatus::Failed | ClientStatus::Lost
        )
    }
}

impl std::fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ClientStatus::Pending => "pending",
            ClientStatus::Running => "running",
            ClientStatus::Complete => "complete",
            ClientStatus::Failed => "failed",
            ClientStatus::Lost => "lost",
            ClientStatus::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Abbreviated allocation returned by list endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationListStub {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "JobID")]
    pub job_id: String,
    #[serde(rename = "NodeID", default)]
    pub node_id: String,
    #[serde(rename = "TaskGroup", default)]
    pub task_group: String,
    #[serde(rename = "DesiredStatus", default)]
    pub desired_status: String,
    #[serde(rename = "ClientStatus")]
    pub client_status: ClientStatus,
}

/// Full allocation detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Allocation {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "JobID")]
    pub job_id: String,
    #[serde(rename = "NodeID", default)]
    pub node_id: String,
    #[serde(rename = "TaskGroup", default)]
    pub task_group: String,
    #[serde(rename = "DesiredStatus", default)]
    pub desired_status: String,
    #[serde(rename = "ClientStatus")]
    pub client_status: ClientStatus,
    #[serde(rename = "ClientDescription", default)]
    pub client_description: String,
    #[serde(rename = "TaskStates", default)]
    pub task_states: Option<HashMap<String, TaskState>>,
}

impl Allocation {
    /// Names of tasks that ended in a failed state, sorted
    pub fn failed_tasks(&self) -> Vec<&str> {
        let mut failed: Vec<&str> = self
            .task_states
            .iter()
            .flatten()
            .filter(|(_, state)| state.failed)
            .map(|(name, _)| name.as_str())
            .collect();
        failed.sort_unstable();
        failed
    }
}

/// Per-task state inside an allocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskState {
    #[serde(rename = "State", default)]
    pub state: String,
    #[serde(rename = "Failed", default)]
    pub failed: bool,
    #[serde(rename = "Restarts", default)]
    pub restarts: u64,
}
