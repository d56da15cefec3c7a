//! Client configuration.
//!
//! The credential is resolved eagerly: a [`McpClientConfig`] cannot exist
//! without a non-empty access token, so misconfiguration surfaces before any
//! transport is built.

use std::fmt;
use std::time::Duration;

use crate::protocol::McpError;

/// Hosted Mapbox MCP endpoint
pub const MAPBOX_MCP_URL: &str = "https://mcp.mapbox.com/mcp";

/// Environment variable holding the bearer credential
pub const ACCESS_TOKEN_ENV: &str = "MAPBOX_ACCESS_TOKEN";

/// Optional request timeout override, in whole seconds
pub const TIMEOUT_ENV: &str = "MAPBOX_MCP_TIMEOUT_SECS";

/// Optional transport retry count
pub const MAX_RETRIES_ENV: &str = "MAPBOX_MCP_MAX_RETRIES";

/// Default timeout for a single HTTP exchange
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Retry policy for transport failures.
///
/// Only errors for which [`McpError::is_retryable`] holds are retried; a
/// remote tool error is never resent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first one
    pub max_retries: u32,

    /// Delay before the first retry, doubled on each subsequent retry
    pub initial_backoff: Duration,
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            initial_backoff: Duration::from_millis(250),
        }
    }

    pub fn new(max_retries: u32, initial_backoff: Duration) -> Self {
        Self {
            max_retries,
            initial_backoff,
        }
    }

    /// Backoff before retry number `retry` (1-based)
    pub fn backoff_for(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        self.initial_backoff.saturating_mul(factor)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

/// MCP Client Configuration
#[derive(Clone)]
pub struct McpClientConfig {
    endpoint: String,
    access_token: String,

    /// Timeout for each HTTP exchange
    pub request_timeout: Duration,

    pub retry: RetryPolicy,
}

impl McpClientConfig {
    /// Build a configuration from an explicit credential.
    ///
    /// Fails with [`McpError::Configuration`] if the token is blank.
    pub fn new(access_token: impl Into<String>) -> Result<Self, McpError> {
        Self::resolve(Some(access_token.into()), |_| None)
    }

    /// Build a configuration from the process environment (see [`ACCESS_TOKEN_ENV`]).
    pub fn from_env() -> Result<Self, McpError> {
        Self::resolve(None, |key| std::env::var(key).ok())
    }

    /// Use `explicit` if given, otherwise read `MAPBOX_ACCESS_TOKEN` through `lookup`.
    pub fn resolve<F>(explicit: Option<String>, lookup: F) -> Result<Self, McpError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let access_token = explicit
            .filter(|t| !t.trim().is_empty())
            .or_else(|| lookup(ACCESS_TOKEN_ENV).filter(|t| !t.trim().is_empty()))
            .ok_or_else(|| McpError::configuration(format!("{ACCESS_TOKEN_ENV} is required")))?;

        let request_timeout = match lookup(TIMEOUT_ENV) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(McpError::configuration(format!(
                        "{TIMEOUT_ENV} must be a positive integer"
                    )))
                }
            },
            None => DEFAULT_TIMEOUT,
        };

        let mut retry = RetryPolicy::default();
        if let Some(raw) = lookup(MAX_RETRIES_ENV) {
            retry.max_retries = raw.trim().parse::<u32>().map_err(|_| {
                McpError::configuration(format!("{MAX_RETRIES_ENV} must be a non-negative integer"))
            })?;
        }

        Ok(Self {
            endpoint: MAPBOX_MCP_URL.to_string(),
            access_token: access_token.trim().to_string(),
            request_timeout,
            retry,
        })
    }

    /// Point the client at a different endpoint, e.g. a local stub server.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// `Authorization` header value
    pub(crate) fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

impl fmt::Debug for McpClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("McpClientConfig")
            .field("endpoint", &self.endpoint)
            .field("access_token", &"<redacted>")
            .field("request_timeout", &self.request_timeout)
            .field("retry", &self.retry)
            .finish()
    }
}
