//! The client facade.
//!
//! # Design
//! `Client` owns one resolved `ClientConfig` and one `TransportClient`, and
//! hands out a namespace struct per API area. Namespaces borrow the client,
//! so they cannot outlive it. Dropping the client (or calling `close`)
//! drops the last handle on the connection pool.

use std::sync::Arc;

use crate::config::{ClientConfig, ConfigOverrides, ConfigResolver};
use crate::error::Result;
use crate::http::HttpBackend;
use crate::routes::{Examples, Health};
use crate::transport::TransportClient;

#[derive(Debug, Clone)]
pub struct Client {
    config: Arc<ClientConfig>,
    transport: TransportClient,
}

impl Client {
    /// Builds a client from an already-resolved config.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let config = Arc::new(config);
        let transport = TransportClient::new(config.clone())?;
        tracing::debug!(base_url = config.base_url(), "client created");
        Ok(Self { config, transport })
    }

    /// Resolves `overrides` against the `APIKIT_*` environment, then builds.
    pub fn from_overrides(overrides: ConfigOverrides) -> Result<Self> {
        Self::new(ConfigResolver::new().resolve(overrides)?)
    }

    /// Builds a client entirely from the environment.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Builds a client that sends every request through `backend`.
    pub fn with_backend(config: ClientConfig, backend: Arc<dyn HttpBackend>) -> Self {
        let config = Arc::new(config);
        let transport = TransportClient::with_backend(config.clone(), backend);
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &TransportClient {
        &self.transport
    }

    pub fn examples(&self) -> Examples<'_> {
        Examples::new(&self.transport)
    }

    pub fn health(&self) -> Health<'_> {
        Health::new(&self.transport)
    }

    /// Releases this handle. Clones made with `Clone` keep the pool alive
    /// until they are dropped too.
    pub fn close(self) {
        tracing::debug!(in_flight = self.transport.in_flight(), "client closed");
    }
}
