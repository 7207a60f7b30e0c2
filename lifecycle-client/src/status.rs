//! Cluster status, node and operator endpoints

use crate::NomadClient;
use crate::error::Result;
use lifecycle_core::domain::node::NodeListStub;
use reqwest::Method;

impl NomadClient {
    // =============================================================================
    // Cluster Status
    // =============================================================================

    /// Get the RPC address of the current leader
    ///
    /// Returns an empty string while no leader is elected.
    pub async fn leader(&self) -> Result<String> {
        let response = self
            .request(Method::GET, "/v1/status/leader")
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// List all client nodes
    pub async fn list_nodes(&self) -> Result<Vec<NodeListStub>> {
        let response = self.request(Method::GET, "/v1/nodes").send().await?;

        self.handle_response(response).await
    }

    // =============================================================================
    // Operator
    // =============================================================================

    /// Force a cluster-wide garbage collection of jobs, evaluations and allocations
    pub async fn garbage_collect(&self) -> Result<()> {
        let response = self.request(Method::PUT, "/v1/system/gc").send().await?;

        self.handle_empty_response(response).await
    }
}
