//! Request dispatch.
//!
//! # Design
//! `TransportClient` is cheap to clone and safe to share across tasks. The
//! config is read-only behind an `Arc`; the backend's connection pool is the
//! only shared mutable resource and synchronizes itself. An atomic counter
//! tracks requests in flight. Each `send` holds an RAII guard on it, so the
//! count returns to baseline when the future completes, fails or is dropped.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use reqwest::Url;
use secrecy::ExposeSecret;
use tracing::{debug, warn, Instrument};

use crate::backend::ReqwestBackend;
use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::http::{HttpBackend, HttpMethod, HttpRequest, HttpResponse};
use crate::normalize::{check_status, transport_failure};

#[derive(Clone)]
pub struct TransportClient {
    config: Arc<ClientConfig>,
    backend: Arc<dyn HttpBackend>,
    in_flight: Arc<AtomicUsize>,
}

impl std::fmt::Debug for TransportClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportClient")
            .field("config", &self.config)
            .field("in_flight", &self.in_flight())
            .finish_non_exhaustive()
    }
}

impl TransportClient {
    /// Transport over a pooled reqwest client built from `config`.
    pub fn new(config: Arc<ClientConfig>) -> Result<Self> {
        let backend = ReqwestBackend::new(&config)?;
        Ok(Self::with_backend(config, Arc::new(backend)))
    }

    pub fn with_backend(config: Arc<ClientConfig>, backend: Arc<dyn HttpBackend>) -> Self {
        Self {
            config,
            backend,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Requests currently awaiting a response.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Prefixes the base URL, encodes the query and attaches default headers.
    pub fn build_request(
        &self,
        method: HttpMethod,
        path: &str,
        params: &[(&str, String)],
        body: Option<String>,
    ) -> Result<HttpRequest> {
        let endpoint = self.config.endpoint(path);
        let url = if params.is_empty() {
            endpoint
        } else {
            let mut url = Url::parse(&endpoint)
                .map_err(|e| ApiError::validation(format!("invalid request path {path:?}: {e}")))?;
            url.query_pairs_mut()
                .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())));
            url.into()
        };

        let mut headers = vec![
            (
                "authorization".to_string(),
                format!("Bearer {}", self.config.api_key().expose_secret()),
            ),
            ("accept".to_string(), "application/json".to_string()),
            ("user-agent".to_string(), self.config.user_agent().to_string()),
        ];
        if body.is_some() {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }

        Ok(HttpRequest {
            method,
            url,
            headers,
            body,
        })
    }

    /// Issues one request. Non-2xx responses come back as `HttpStatus` and
    /// backend failures as `Transport`.
    pub async fn send(
        &self,
        method: HttpMethod,
        path: &str,
        params: &[(&str, String)],
        body: Option<String>,
    ) -> Result<HttpResponse> {
        let request = self.build_request(method, path, params, body)?;
        let span = tracing::debug_span!("http_request", %method, path);
        self.dispatch(request).instrument(span).await
    }

    async fn dispatch(&self, request: HttpRequest) -> Result<HttpResponse> {
        let _guard = InFlightGuard::enter(&self.in_flight);
        let started = Instant::now();
        debug!("sending request");

        let outcome = self.backend.execute(request).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok(response) => {
                debug!(status = response.status, elapsed_ms, "received response");
                check_status(response).inspect_err(|err| {
                    warn!(status = err.status(), elapsed_ms, "request rejected");
                })
            }
            Err(err) => {
                let err = transport_failure(err);
                warn!(error = %err, elapsed_ms, "request failed");
                Err(err)
            }
        }
    }
}

struct InFlightGuard {
    counter: Arc<AtomicUsize>,
}

impl InFlightGuard {
    fn enter(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self {
            counter: counter.clone(),
        }
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::SeqCst);
    }
}
