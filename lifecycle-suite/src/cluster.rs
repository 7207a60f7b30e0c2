//! Cluster boundary
//!
//! The suite only ever talks to the orchestrator through [`Cluster`]. The
//! HTTP client implements it for real runs; tests substitute a scripted fake.

use async_trait::async_trait;
use lifecycle_client::{NomadClient, Result};
use lifecycle_core::domain::allocation::{Allocation, AllocationListStub};
use lifecycle_core::domain::fs::AllocFileInfo;
use lifecycle_core::domain::job::Job;
use lifecycle_core::domain::node::NodeListStub;
use lifecycle_core::dto::job::{JobDeregisterResponse, JobRegisterResponse};

use crate::config::Config;

/// Orchestrator operations the lifecycle suite depends on
#[async_trait]
pub trait Cluster: Send + Sync {
    /// RPC address of the elected leader, empty while there is none
    async fn leader(&self) -> Result<String>;

    /// All client nodes known to the servers
    async fn list_nodes(&self) -> Result<Vec<NodeListStub>>;

    /// Converts an HCL job file into a registrable job
    async fn parse_job(&self, hcl: &str) -> Result<Job>;

    /// Registers a job
    async fn register_job(&self, job: &Job) -> Result<JobRegisterResponse>;

    /// Allocations placed for a job
    async fn job_allocations(&self, job_id: &str) -> Result<Vec<AllocationListStub>>;

    /// Full allocation detail
    async fn allocation(&self, alloc_id: &str) -> Result<Allocation>;

    /// Stops a job, optionally purging it
    async fn deregister_job(&self, job_id: &str, purge: bool) -> Result<JobDeregisterResponse>;

    /// Lists a directory inside an allocation
    async fn list_alloc_files(&self, alloc_id: &str, path: &str) -> Result<Vec<AllocFileInfo>>;

    /// Triggers a cluster-wide garbage collection
    async fn garbage_collect(&self) -> Result<()>;
}

#[async_trait]
impl Cluster for NomadClient {
    async fn leader(&self) -> Result<String> {
        NomadClient::leader(self).await
    }

    async fn list_nodes(&self) -> Result<Vec<NodeListStub>> {
        NomadClient::list_nodes(self).await
    }

    async fn parse_job(&self, hcl: &str) -> Result<Job> {
        NomadClient::parse_job(self, hcl).await
    }

    async fn register_job(&self, job: &Job) -> Result<JobRegisterResponse> {
        NomadClient::register_job(self, job).await
    }

    async fn job_allocations(&self, job_id: &str) -> Result<Vec<AllocationListStub>> {
        NomadClient::job_allocations(self, job_id).await
    }

    async fn allocation(&self, alloc_id: &str) -> Result<Allocation> {
        NomadClient::allocation(self, alloc_id).await
    }

    async fn deregister_job(&self, job_id: &str, purge: bool) -> Result<JobDeregisterResponse> {
        NomadClient::deregister_job(self, job_id, purge).await
    }

    async fn list_alloc_files(&self, alloc_id: &str, path: &str) -> Result<Vec<AllocFileInfo>> {
        NomadClient::list_alloc_files(self, alloc_id, path).await
    }

    async fn garbage_collect(&self) -> Result<()> {
        NomadClient::garbage_collect(self).await
    }
}

/// Builds the HTTP client described by the configuration
pub fn connect(config: &Config) -> NomadClient {
    let mut client = NomadClient::new(config.nomad_addr.clone());

    if let Some(token) = &config.token {
        client = client.with_token(token.clone());
    }
    if let Some(namespace) = &config.namespace {
        client = client.with_namespace(namespace.clone());
    }
    if let Some(region) = &config.region {
        client = client.with_region(region.clone());
    }

    client
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_uses_configured_address() {
        let mut config = Config::new("http://nomad.service.consul:4646/".to_string());
        config.token = Some("secret".to_string());

        let client = connect(&config);
        assert_eq!(client.base_url(), "http://nomad.service.consul:4646");
    }
}
