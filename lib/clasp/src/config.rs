//! Settings of the bundled hyper transport.

use std::time::Duration;

/// Timeouts and connection pool sizing for [`HyperClient`](crate::HyperClient).
///
/// Start from the defaults and override with the `with_*` setters:
///
/// ```
/// use std::time::Duration;
///
/// use clasp::TransportConfig;
///
/// let config = TransportConfig::default()
///     .with_timeout(Duration::from_secs(5))
///     .with_pool_idle_per_host(4);
///
/// assert_eq!(config.timeout, Duration::from_secs(5));
/// assert_eq!(config.connect_timeout, TransportConfig::DEFAULT_CONNECT_TIMEOUT);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// Bound on a whole exchange: connecting, sending, and reading the body
    /// to its last byte.
    pub timeout: Duration,
    /// TCP connect timeout, applied by the connector.
    pub connect_timeout: Duration,
    /// Idle connections kept per host.
    pub pool_idle_per_host: usize,
    /// How long an idle pooled connection is kept.
    pub pool_idle_timeout: Duration,
}

impl TransportConfig {
    /// Default exchange timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
    /// Default connect timeout.
    pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
    /// Default idle connections per host.
    pub const DEFAULT_POOL_IDLE_PER_HOST: usize = 32;
    /// Default idle connection lifetime.
    pub const DEFAULT_POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

    /// Replace the exchange timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replace the connect timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Replace the idle connections kept per host.
    #[must_use]
    pub const fn with_pool_idle_per_host(mut self, count: usize) -> Self {
        self.pool_idle_per_host = count;
        self
    }

    /// Replace the idle connection lifetime.
    #[must_use]
    pub const fn with_pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = timeout;
        self
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Self::DEFAULT_TIMEOUT,
            connect_timeout: Self::DEFAULT_CONNECT_TIMEOUT,
            pool_idle_per_host: Self::DEFAULT_POOL_IDLE_PER_HOST,
            pool_idle_timeout: Self::DEFAULT_POOL_IDLE_TIMEOUT,
        }
    }
}
