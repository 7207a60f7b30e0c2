//! Job-related API endpoints

use crate::error::Result;
use crate::{NomadClient, require_id};
use lifecycle_core::domain::allocation::AllocationListStub;
use lifecycle_core::domain::job::Job;
use lifecycle_core::dto::job::{
    JobDeregisterResponse, JobParseRequest, JobRegisterRequest, JobRegisterResponse,
};
use reqwest::Method;

impl NomadClient {
    // =============================================================================
    // Job Definition
    // =============================================================================

    /// Convert an HCL job file into its canonical JSON form
    ///
    /// # Arguments
    /// * `hcl` - The job file contents
    ///
    /// # Returns
    /// The parsed job, ready to register
    pub async fn parse_job(&self, hcl: &str) -> Result<Job> {
        let response = self
            .request(Method::POST, "/v1/jobs/parse")
            .json(&JobParseRequest {
                job_hcl: hcl.to_string(),
                canonicalize: true,
            })
            .send()
            .await?;

        self.handle_response(response).await
    }

    // =============================================================================
    // Job Lifecycle
    // =============================================================================

    /// Register a job
    ///
    /// # Example
    /// ```no_run
    /// # use lifecycle_client::NomadClient;
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = NomadClient::new("http://127.0.0.1:4646");
    /// let job = client.parse_job("job \"example\" { ... }").await?;
    /// let ack = client.register_job(&job.with_id("example-1")).await?;
    /// println!("evaluation {}", ack.eval_id);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn register_job(&self, job: &Job) -> Result<JobRegisterResponse> {
        let response = self
            .request(Method::POST, "/v1/jobs")
            .json(&JobRegisterRequest { job: job.clone() })
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Deregister (stop) a job
    ///
    /// # Arguments
    /// * `job_id` - The job ID
    /// * `purge` - Also remove the job from the state store instead of only stopping it
    pub async fn deregister_job(&self, job_id: &str, purge: bool) -> Result<JobDeregisterResponse> {
        let job_id = require_id("job", job_id)?;
        let response = self
            .request(Method::DELETE, &format!("/v1/job/{}", job_id))
            .query(&[("purge", purge)])
            .send()
            .await?;

        self.handle_response(response).await
    }

    // =============================================================================
    // Job Query
    // =============================================================================

    /// List the allocations placed for a job
    pub async fn job_allocations(&self, job_id: &str) -> Result<Vec<AllocationListStub>> {
        let job_id = require_id("job", job_id)?;
        let response = self
            .request(Method::GET, &format!("/v1/job/{}/allocations", job_id))
            .send()
            .await?;

        self.handle_response(response).await
    }
}
