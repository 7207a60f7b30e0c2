//! Allocation-related API endpoints

use crate::error::Result;
use crate::{NomadClient, require_id};
use lifecycle_core::domain::allocation::Allocation;
use lifecycle_core::domain::fs::AllocFileInfo;
use reqwest::Method;

impl NomadClient {
    /// Get full allocation detail
    ///
    /// # Arguments
    /// * `alloc_id` - The allocation ID
    pub async fn allocation(&self, alloc_id: &str) -> Result<Allocation> {
        let alloc_id = require_id("allocation", alloc_id)?;
        let response = self
            .request(Method::GET, &format!("/v1/allocation/{}", alloc_id))
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// List a directory inside an allocation
    ///
    /// The request is served by the client node running the allocation, so it
    /// keeps working after the allocation stops until the node collects it.
    ///
    /// # Arguments
    /// * `alloc_id` - The allocation ID
    /// * `path` - Directory relative to the allocation root (e.g., "alloc")
    pub async fn list_alloc_files(&self, alloc_id: &str, path: &str) -> Result<Vec<AllocFileInfo>> {
        let alloc_id = require_id("allocation", alloc_id)?;
        let response = self
            .request(Method::GET, &format!("/v1/client/fs/ls/{}", alloc_id))
            .query(&[("path", path)])
            .send()
            .await?;

        self.handle_response(response).await
    }
}
