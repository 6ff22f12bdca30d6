//! Client configuration.
//!
//! Configuration is passed explicitly to [`GameClient::new`](crate::GameClient::new)
//! and the transports; nothing is read from globals after construction.

use std::time::Duration;

/// Environment variable overriding the API base URL.
pub const ENV_API_URL: &str = "SEQUENCE_API_URL";

/// Environment variable holding an optional bearer token.
pub const ENV_BEARER_TOKEN: &str = "SEQUENCE_API_BEARER_TOKEN";

/// Environment variable naming the proxy target used when no API URL is set.
pub const ENV_PROXY_TARGET: &str = "SEQUENCE_API_PROXY_TARGET";

/// Proxy target used when neither an API URL nor a proxy target is set.
pub const DEFAULT_PROXY_TARGET: &str = "http://localhost:8080";

/// Default refresh cadence for an active game route.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Lower bound on the refresh cadence.
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Default capacity of the bounded poll event channel.
const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 64;

/// Default timeout for stopping a polling loop.
const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(1);

/// Default per-request timeout for the HTTP transport.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for a [`GameClient`](crate::GameClient) and its transport.
///
/// # Example
///
/// ```
/// use sequence_client::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::new()
///     .with_api_url("https://sequence.example.com/api/")
///     .with_poll_interval(Duration::from_millis(500));
/// assert_eq!(config.base_url(), "https://sequence.example.com/api");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Explicit API base URL, without trailing slashes.
    pub api_url: Option<String>,
    /// Sent as `Authorization: Bearer <token>` on every request when set.
    pub bearer_token: Option<String>,
    /// Base URL used when `api_url` is unset.
    pub proxy_target: String,
    /// Interval between polls of an active game route.
    ///
    /// Defaults to **1 second**. Values below 10 ms are clamped.
    pub poll_interval: Duration,
    /// Capacity of the bounded poll event channel.
    ///
    /// Defaults to **64**. Values below 1 are clamped to 1.
    pub event_channel_capacity: usize,
    /// Time a polling loop is given to stop before it is aborted.
    pub shutdown_timeout: Duration,
    /// Per-request timeout for the HTTP transport.
    pub request_timeout: Duration,
}

impl ClientConfig {
    /// Defaults, without reading the environment.
    pub fn new() -> Self {
        Self {
            api_url: None,
            bearer_token: None,
            proxy_target: DEFAULT_PROXY_TARGET.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            event_channel_capacity: DEFAULT_EVENT_CHANNEL_CAPACITY,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Defaults overridden by `SEQUENCE_API_URL`, `SEQUENCE_API_BEARER_TOKEN`
    /// and `SEQUENCE_API_PROXY_TARGET`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) with a custom variable source.
    /// Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::new();
        if let Some(url) = non_blank(lookup(ENV_API_URL)) {
            config = config.with_api_url(url);
        }
        if let Some(token) = non_blank(lookup(ENV_BEARER_TOKEN)) {
            config = config.with_bearer_token(token);
        }
        if let Some(target) = non_blank(lookup(ENV_PROXY_TARGET)) {
            config = config.with_proxy_target(target);
        }
        config
    }

    /// Set the API base URL. Whitespace and trailing slashes are removed;
    /// a blank URL clears the override.
    #[must_use]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = non_blank(Some(url.into())).map(|url| trim_slashes(&url));
        self
    }

    /// Set the bearer token. A blank token clears it.
    #[must_use]
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = non_blank(Some(token.into()));
        self
    }

    /// Set the proxy target. A blank value restores the default.
    #[must_use]
    pub fn with_proxy_target(mut self, target: impl Into<String>) -> Self {
        self.proxy_target = non_blank(Some(target.into()))
            .map(|target| trim_slashes(&target))
            .unwrap_or_else(|| DEFAULT_PROXY_TARGET.to_string());
        self
    }

    /// Set the poll interval. Values below 10 ms are clamped.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval.max(MIN_POLL_INTERVAL);
        self
    }

    /// Set the poll event channel capacity. Values below 1 are clamped to 1.
    #[must_use]
    pub fn with_event_channel_capacity(mut self, capacity: usize) -> Self {
        self.event_channel_capacity = capacity.max(1);
        self
    }

    /// Set the polling loop shutdown timeout.
    #[must_use]
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Set the per-request timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Effective base URL: the API URL if set, else the proxy target.
    pub fn base_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(&self.proxy_target)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

// Keep the token out of logs.
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_url", &self.api_url)
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "<redacted>"))
            .field("proxy_target", &self.proxy_target)
            .field("poll_interval", &self.poll_interval)
            .field("event_channel_capacity", &self.event_channel_capacity)
            .field("shutdown_timeout", &self.shutdown_timeout)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn trim_slashes(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}
