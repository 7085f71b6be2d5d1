use crate::error::Result;
use crate::http::HttpMethod;
use crate::normalize::decode;
use crate::transport::TransportClient;
use crate::types::HealthStatus;

/// Service liveness probe at `/health`.
#[derive(Debug, Clone, Copy)]
pub struct Health<'a> {
    transport: &'a TransportClient,
}

impl<'a> Health<'a> {
    pub(crate) fn new(transport: &'a TransportClient) -> Self {
        Self { transport }
    }

    pub async fn check(&self) -> Result<HealthStatus> {
        let response = self.transport.send(HttpMethod::Get, "/health", &[], None).await?;
        decode(&response)
    }
}
