use std::time::Duration;

use tracing::debug;

use crate::errors::{CheckError, ServiceError};
use crate::request::{CheckRequest, Credential};

/// Raw answer from the analysis service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceResponse {
    pub status: u16,
    pub body: String,
}

impl ServiceResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// One request-response exchange with the analysis service.
///
/// Implementations must not retry. Non-success statuses are returned as a
/// normal [`ServiceResponse`]; only transport faults are errors.
#[async_trait::async_trait]
pub trait AnalysisService: Send + Sync {
    async fn check_once(
        &self,
        endpoint: &str,
        request: &CheckRequest,
        credential: &Credential,
    ) -> Result<ServiceResponse, ServiceError>;
}

/// reqwest-backed [`AnalysisService`].
pub struct HttpAnalysisService {
    client: reqwest::Client,
}

impl HttpAnalysisService {
    /// Builds a client. `timeout` applies to the whole exchange.
    pub fn new(timeout: Option<Duration>) -> Result<Self, CheckError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| CheckError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Wraps an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl AnalysisService for HttpAnalysisService {
    async fn check_once(
        &self,
        endpoint: &str,
        request: &CheckRequest,
        credential: &Credential,
    ) -> Result<ServiceResponse, ServiceError> {
        let response = self
            .client
            .post(endpoint)
            .bearer_auth(credential.expose())
            .json(request)
            .send()
            .await
            .map_err(|e| ServiceError::transport(describe_reqwest_error(&e)))?;
        let status = response.status().as_u16();
        debug!(
            event = "check.response_headers",
            domain = "check",
            status = status
        );
        let body = response
            .text()
            .await
            .map_err(|e| ServiceError::transport(format!("failed to read response body: {e}")))?;
        Ok(ServiceResponse { status, body })
    }
}

fn describe_reqwest_error(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("request timed out: {err}")
    } else if err.is_connect() {
        format!("failed to connect: {err}")
    } else {
        format!("request failed: {err}")
    }
}
