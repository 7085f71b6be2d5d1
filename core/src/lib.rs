//! Typed async API client core.
//!
//! # Overview
//! `Client` resolves its connection settings once, owns a pooled HTTP
//! transport, and exposes one namespace per API area (`examples()`,
//! `health()`). Every failure reaches the caller as an `ApiError`.
//!
//! # Design
//! - `ConfigResolver` is the only reader of the `APIKIT_*` environment;
//!   everything downstream receives an immutable `ClientConfig`.
//! - `TransportClient` builds plain-data `HttpRequest` values and hands them
//!   to an `HttpBackend`. The default backend wraps `reqwest`; tests plug in
//!   their own to count calls or inject failures.
//! - Request models validate at construction, response models right after
//!   decoding, so malformed input never reaches the network.
//! - `normalize` classifies every failure: no response means `Transport`,
//!   a non-2xx status means `HttpStatus`, a bad payload means `Validation`.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod backend;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
mod normalize;
pub mod routes;
pub mod transport;
pub mod types;

pub use backend::ReqwestBackend;
pub use client::Client;
pub use config::{ClientConfig, ConfigOverrides, ConfigResolver};
pub use error::{ApiError, Result, TransportErrorKind};
pub use http::{BackendError, HttpBackend, HttpMethod, HttpRequest, HttpResponse};
pub use routes::{Examples, Health};
pub use transport::TransportClient;
pub use types::{
    CreateExample, Example, ExampleId, ExampleList, HealthStatus, ListExamplesParams, UpdateExample,
};
