//! Server configuration assembled by the binary before binding.

use std::net::SocketAddr;

use actix_web::cookie::time::Duration;
#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

use course_admin::inbound::http::session_config::SessionSettings;

/// Lifetime of a session cookie issued at login.
pub const DEFAULT_SESSION_TTL: Duration = Duration::hours(2);

/// Everything `create_server` needs besides the shared state.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) session_ttl: Duration,
    pub(crate) bind_addr: SocketAddr,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Bind to `bind_addr` and issue cookies from `session`.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr) -> Self {
        Self {
            session,
            session_ttl: DEFAULT_SESSION_TTL,
            bind_addr,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Override how long a login stays valid.
    #[must_use]
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    #[cfg(feature = "metrics")]
    /// Serve Prometheus metrics at `/metrics` when present.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}
