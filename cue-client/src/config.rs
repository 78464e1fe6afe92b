//! Client configuration
//!
//! Defaults can be overridden from the environment (`CUE_*` variables) and
//! then per field with the `with_*` builders.

use std::time::Duration;

/// Default backend base URL
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8080";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default countdown tick in milliseconds
pub const DEFAULT_TICK_MILLIS: u64 = 1000;

/// Default number of ticks between two re-queries of the occupation
pub const DEFAULT_REFETCH_EVERY: u32 = 15;

/// Client configuration for connecting to the occupancy backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:8080")
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Countdown tick in milliseconds
    pub tick_millis: u64,

    /// Ticks between two occupation re-queries; 0 disables periodic re-queries
    pub refetch_every: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BACKEND_URL)
    }
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT_SECS,
            tick_millis: DEFAULT_TICK_MILLIS,
            refetch_every: DEFAULT_REFETCH_EVERY,
        }
    }

    /// Load from environment variables
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | CUE_BACKEND_URL | http://localhost:8080 |
    /// | CUE_REQUEST_TIMEOUT_SECS | 30 |
    /// | CUE_TICK_MILLIS | 1000 |
    /// | CUE_REFETCH_EVERY | 15 |
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("CUE_BACKEND_URL")
                .unwrap_or_else(|_| DEFAULT_BACKEND_URL.into()),
            timeout: env_parse("CUE_REQUEST_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS),
            tick_millis: env_parse("CUE_TICK_MILLIS", DEFAULT_TICK_MILLIS),
            refetch_every: env_parse("CUE_REFETCH_EVERY", DEFAULT_REFETCH_EVERY),
        }
    }

    /// Set the base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the countdown tick
    pub fn with_tick_millis(mut self, millis: u64) -> Self {
        self.tick_millis = millis;
        self
    }

    /// Set the re-query cadence, in ticks
    pub fn with_refetch_every(mut self, ticks: u32) -> Self {
        self.refetch_every = ticks;
        self
    }

    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Tick period, never shorter than 1 ms
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_millis.max(1))
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!(key, value = %raw, "Ignoring unparsable environment variable");
                default
            }
        },
        Err(_) => default,
    }
}
