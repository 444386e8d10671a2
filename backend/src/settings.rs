//! Application settings loaded via OrthoConfig.
//!
//! Values come from `COURSE_ADMIN_*` environment variables, CLI flags or a
//! configuration file. Without a database URL the server keeps its data in
//! memory.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use actix_web::cookie::time::Duration;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use zeroize::Zeroizing;

use crate::outbound::persistence::PoolConfig;

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// Process-level configuration.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "COURSE_ADMIN")]
pub struct AppSettings {
    /// Interface to bind, `0.0.0.0` when absent.
    pub host: Option<IpAddr>,
    /// TCP port to listen on.
    #[ortho_config(default = 8080)]
    pub port: u16,
    /// PostgreSQL URL. Absent means the in-memory store.
    pub database_url: Option<String>,
    /// Upper bound on pooled connections.
    #[ortho_config(default = 10)]
    pub db_max_connections: u32,
    /// Username of the administrator created on first start.
    pub admin_username: Option<String>,
    /// Password of the administrator created on first start.
    pub admin_password: Option<String>,
    /// Apply embedded migrations before serving. Defaults to on.
    pub run_migrations: Option<bool>,
    /// Minutes a login session stays valid.
    #[ortho_config(default = 120)]
    pub session_ttl_minutes: u32,
}

impl AppSettings {
    /// Socket address the server binds to.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host.unwrap_or(DEFAULT_HOST), self.port)
    }

    /// Whether embedded migrations run at startup.
    pub fn run_migrations(&self) -> bool {
        self.run_migrations.unwrap_or(true)
    }

    /// Session cookie lifetime.
    pub fn session_ttl(&self) -> Duration {
        Duration::minutes(i64::from(self.session_ttl_minutes))
    }

    /// Pool configuration, when a database is configured.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        self.database_url
            .as_deref()
            .map(|url| {
                PoolConfig::new(url)
                    .with_max_size(self.db_max_connections)
                    .with_min_idle(Some(self.db_max_connections.min(2)))
            })
    }

    /// Bootstrap admin credentials, when both halves are present.
    pub fn admin_credentials(&self) -> Option<(String, Zeroizing<String>)> {
        match (&self.admin_username, &self.admin_password) {
            (Some(username), Some(password)) => {
                Some((username.clone(), Zeroizing::new(password.clone())))
            }
            _ => None,
        }
    }
}
