//! Connection settings and their resolution.
//!
//! # Design
//! `ClientConfig` is immutable once built; replacing a setting means building
//! a new value. `ConfigResolver` is the only place that reads the process
//! environment. Per field the order is: explicit override, then the
//! `APIKIT_*` variable, then a default (timeout and user agent only). A
//! missing API key or base URL is a `Configuration` error.

use std::time::Duration;

use figment::providers::Env;
use figment::Figment;
use reqwest::header::HeaderValue;
use reqwest::Url;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::error::{ApiError, Result};

/// Prefix shared by every environment variable the resolver reads.
pub const ENV_PREFIX: &str = "APIKIT_";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 10;

/// Fully-resolved connection settings shared by every request.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    api_key: SecretString,
    base_url: String,
    timeout: Duration,
    user_agent: String,
    pool_max_idle_per_host: usize,
}

impl ClientConfig {
    /// Builds a config from explicit values only; the environment is not read.
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        ConfigOverrides::new()
            .api_key(api_key)
            .base_url(base_url)
            .into_config()
    }

    /// Resolves a config entirely from `APIKIT_*` environment variables.
    pub fn from_env() -> Result<Self> {
        ConfigResolver::new().resolve(ConfigOverrides::new())
    }

    pub fn api_key(&self) -> &SecretString {
        &self.api_key
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn pool_max_idle_per_host(&self) -> usize {
        self.pool_max_idle_per_host
    }

    /// Joins an endpoint path onto the base URL.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// Partially-specified settings. Unset fields fall back to the environment
/// when passed through `ConfigResolver::resolve`.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    api_key: Option<SecretString>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    pool_max_idle_per_host: Option<usize>,
}

impl ConfigOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::from(api_key.into()));
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn pool_max_idle_per_host(mut self, max_idle: usize) -> Self {
        self.pool_max_idle_per_host = Some(max_idle);
        self
    }

    /// Fields the environment can still supply.
    fn needs_env(&self) -> bool {
        self.api_key.is_none() || self.base_url.is_none() || self.timeout.is_none()
    }

    /// Fills every unset field from `fallback`.
    fn or(self, fallback: ConfigOverrides) -> Self {
        ConfigOverrides {
            api_key: self.api_key.or(fallback.api_key),
            base_url: self.base_url.or(fallback.base_url),
            timeout: self.timeout.or(fallback.timeout),
            user_agent: self.user_agent.or(fallback.user_agent),
            pool_max_idle_per_host: self.pool_max_idle_per_host.or(fallback.pool_max_idle_per_host),
        }
    }

    /// Validates and finalizes without consulting the environment.
    pub fn into_config(self) -> Result<ClientConfig> {
        let api_key = self
            .api_key
            .ok_or_else(|| ApiError::configuration(format!("api_key is not set (explicitly or via {ENV_PREFIX}API_KEY)")))?;
        if api_key.expose_secret().trim().is_empty() {
            return Err(ApiError::configuration("api_key must not be empty"));
        }
        // Must be sendable as an Authorization header value.
        if HeaderValue::from_str(&format!("Bearer {}", api_key.expose_secret())).is_err() {
            return Err(ApiError::configuration(
                "api_key contains characters not allowed in an HTTP header",
            ));
        }

        let base_url = self
            .base_url
            .ok_or_else(|| ApiError::configuration(format!("base_url is not set (explicitly or via {ENV_PREFIX}BASE_URL)")))?;
        let base_url = validate_base_url(&base_url)?;

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        if timeout.is_zero() {
            return Err(ApiError::configuration("timeout must be positive"));
        }

        let pool_max_idle_per_host = self
            .pool_max_idle_per_host
            .unwrap_or(DEFAULT_POOL_MAX_IDLE_PER_HOST);

        let user_agent = self.user_agent.unwrap_or_else(default_user_agent);
        if HeaderValue::from_str(&user_agent).is_err() {
            return Err(ApiError::configuration(format!(
                "user_agent {user_agent:?} is not a valid HTTP header value"
            )));
        }

        Ok(ClientConfig {
            api_key,
            base_url,
            timeout,
            user_agent,
            pool_max_idle_per_host,
        })
    }
}

impl From<&ClientConfig> for ConfigOverrides {
    fn from(config: &ClientConfig) -> Self {
        ConfigOverrides {
            api_key: Some(config.api_key.clone()),
            base_url: Some(config.base_url.clone()),
            timeout: Some(config.timeout),
            user_agent: Some(config.user_agent.clone()),
            pool_max_idle_per_host: Some(config.pool_max_idle_per_host),
        }
    }
}

/// Resolves a `ClientConfig` from explicit overrides plus the environment.
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    prefix: String,
}

impl Default for ConfigResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigResolver {
    pub fn new() -> Self {
        Self::with_prefix(ENV_PREFIX)
    }

    /// Reads variables under a different prefix, e.g. `MYAPI_`.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Produces a fully-populated config. The environment is consulted at
    /// most once, and only if some field was not given explicitly.
    pub fn resolve(&self, explicit: ConfigOverrides) -> Result<ClientConfig> {
        let merged = if explicit.needs_env() {
            explicit.or(self.read_env()?)
        } else {
            explicit
        };
        let config = merged.into_config()?;
        tracing::debug!(
            base_url = %config.base_url,
            timeout_ms = config.timeout.as_millis() as u64,
            "resolved client configuration"
        );
        Ok(config)
    }

    fn read_env(&self) -> Result<ConfigOverrides> {
        // Text settings are taken verbatim; figment would coerce "0123" to a number.
        let api_key = Env::var(&format!("{}API_KEY", self.prefix)).map(SecretString::from);
        let base_url = Env::var(&format!("{}BASE_URL", self.prefix));

        let layer: EnvLayer = Figment::new()
            .merge(Env::prefixed(&self.prefix).only(&["timeout_secs"]))
            .extract()
            .map_err(|e| ApiError::configuration(format!("invalid {}* environment: {e}", self.prefix)))?;

        let timeout = layer
            .timeout_secs
            .map(|secs| {
                Duration::try_from_secs_f64(secs).map_err(|_| {
                    ApiError::configuration(format!("{}TIMEOUT_SECS must be a positive number of seconds", self.prefix))
                })
            })
            .transpose()?;

        Ok(ConfigOverrides {
            api_key,
            base_url,
            timeout,
            user_agent: None,
            pool_max_idle_per_host: None,
        })
    }
}

/// Numeric environment settings as figment extracts them (prefix stripped).
#[derive(Debug, Default, Deserialize)]
struct EnvLayer {
    #[serde(default)]
    timeout_secs: Option<f64>,
}

fn default_user_agent() -> String {
    format!("apikit/{}", env!("CARGO_PKG_VERSION"))
}

fn validate_base_url(raw: &str) -> Result<String> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ApiError::configuration(format!("base_url {raw:?} is not an absolute URL: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ApiError::configuration(format!(
            "base_url scheme must be http or https, got {:?}",
            url.scheme()
        )));
    }
    if url.host_str().is_none() {
        return Err(ApiError::configuration("base_url must include a host"));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(ApiError::configuration(
            "base_url must not carry a query string or fragment",
        ));
    }
    Ok(url.as_str().trim_end_matches('/').to_string())
}
