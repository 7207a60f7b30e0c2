//! Client node domain types

use serde::{Deserialize, Serialize};

/// Abbreviated node returned by the node list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeListStub {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Datacenter", default)]
    pub datacenter: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "SchedulingEligibility", default)]
    pub scheduling_eligibility: String,
    #[serde(rename = "Drain", default)]
    pub drain: bool,
}

impl NodeListStub {
    /// A node can take work when it is ready and eligible for scheduling
    pub fn is_ready(&self) -> bool {
        self.status == "ready" && self.scheduling_eligibility == "eligible"
    }
}
