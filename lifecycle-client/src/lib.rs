//! Nomad HTTP Client
//!
//! A small, type-safe client for the parts of the Nomad HTTP API the lifecycle
//! harness needs: job parse/register/deregister, allocation queries, the
//! allocation filesystem, node listing and cluster status.
//!
//! # Example
//!
//! ```no_run
//! use lifecycle_client::NomadClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = NomadClient::new("http://127.0.0.1:4646");
//!
//!     let leader = client.leader().await?;
//!     println!("Cluster leader: {}", leader);
//!     Ok(())
//! }
//! ```

pub mod error;
mod allocations;
mod jobs;
mod status;

// Re-export commonly used types
pub use error::{ClientError, Result};

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Header carrying the ACL token on every request
const TOKEN_HEADER: &str = "X-Nomad-Token";

/// HTTP client for the Nomad API
///
/// Endpoints are organized into logical groups:
/// - Jobs (parse, register, deregister, list allocations)
/// - Allocations (detail, filesystem listing)
/// - Status and operator calls (leader, nodes, garbage collection)
#[derive(Debug, Clone)]
pub struct NomadClient {
    /// Base URL of the agent (e.g., "http://127.0.0.1:4646")
    base_url: String,
    /// HTTP client instance
    client: Client,
    /// ACL token sent as `X-Nomad-Token`
    token: Option<String>,
    /// Namespace query parameter
    namespace: Option<String>,
    /// Region query parameter
    region: Option<String>,
}

impl NomadClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `base_url` - The agent's HTTP address (e.g., "http://127.0.0.1:4646")
    ///
    /// # Example
    /// ```
    /// use lifecycle_client::NomadClient;
    ///
    /// let client = NomadClient::new("http://127.0.0.1:4646");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use lifecycle_client::NomadClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = NomadClient::with_client("http://127.0.0.1:4646", http_client);
    /// ```
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            token: None,
            namespace: None,
            region: None,
        }
    }

    /// Sets the ACL token sent with every request
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Scopes every request to a namespace
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Scopes every request to a region
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Get the base URL of the agent
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // Request Building
    // =============================================================================

    /// Start a request against an API path (e.g., "/v1/jobs")
    ///
    /// Applies the token header and the namespace/region query parameters.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);

        let mut builder = self.client.request(method, &url);

        if let Some(token) = &self.token {
            builder = builder.header(TOKEN_HEADER, token);
        }
        if let Some(namespace) = &self.namespace {
            builder = builder.query(&[("namespace", namespace)]);
        }
        if let Some(region) = &self.region {
            builder = builder.query(&[("region", region)]);
        }

        builder
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// This method checks the status code and returns an appropriate error if
    /// the request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let response = self.check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle an API response whose body is ignored
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        self.check_status(response).await?;
        Ok(())
    }

    async fn check_status(&self, response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(error_text));
        }

        Err(ClientError::api_error(status.as_u16(), error_text))
    }
}

/// Rejects empty identifiers before they turn into a malformed URL
fn require_id<'a>(kind: &str, id: &'a str) -> Result<&'a str> {
    if id.trim().is_empty() {
        return Err(ClientError::InvalidRequest(format!("{} ID cannot be empty", kind)));
    }
    Ok(id)
}
