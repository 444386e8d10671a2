//! Backend entry-point: loads settings, prepares persistence and serves the
//! REST API with OpenAPI docs.

mod server;

#[cfg(feature = "metrics")]
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use course_admin::inbound::http::health::HealthState;
use course_admin::inbound::http::session_config::{
    BuildMode, SessionSettings, session_settings_from_env,
};
use course_admin::outbound::persistence::{DbPool, run_pending_migrations};
use course_admin::settings::AppSettings;
use server::{AdminBootstrap, ServerConfig, build_http_state, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(|e| std::io::Error::other(e.to_string()))?;
    let session = load_session_settings()?;

    let db_pool = connect_database(&settings).await?;
    let admin = settings
        .admin_credentials()
        .map(|(username, password)| AdminBootstrap { username, password });
    let http_state = build_http_state(db_pool, admin).await?;

    let config = ServerConfig::new(session, settings.bind_addr())
        .with_session_ttl(settings.session_ttl());
    #[cfg(feature = "metrics")]
    let config = config.with_metrics(initialize_metrics(|| {
        PrometheusMetricsBuilder::new("course_admin")
            .endpoint("/metrics")
            .build()
    }));

    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, http_state, config)?.await
}

/// Read session cookie settings from the process environment.
fn load_session_settings() -> std::io::Result<SessionSettings> {
    let env = DefaultEnv::new();
    let session = session_settings_from_env(&env, BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;
    info!(
        fingerprint = %session.key_fingerprint(),
        cookie_secure = session.cookie_secure,
        "session key loaded"
    );
    Ok(session)
}

/// Open the pool and apply migrations when a database URL is configured.
async fn connect_database(settings: &AppSettings) -> std::io::Result<Option<DbPool>> {
    let Some(pool_config) = settings.pool_config() else {
        return Ok(None);
    };
    if settings.run_migrations() {
        let url = pool_config.database_url().to_owned();
        tokio::task::spawn_blocking(move || run_pending_migrations(&url))
            .await
            .map_err(std::io::Error::other)?
            .map_err(std::io::Error::other)?;
    }
    let pool = DbPool::new(pool_config)
        .await
        .map_err(std::io::Error::other)?;
    Ok(Some(pool))
}

/// Build the Prometheus middleware, logging and dropping it on failure.
#[cfg(feature = "metrics")]
fn initialize_metrics<F, E>(build: F) -> Option<PrometheusMetrics>
where
    F: FnOnce() -> Result<PrometheusMetrics, E>,
    E: std::fmt::Display,
{
    match build() {
        Ok(metrics) => Some(metrics),
        Err(error) => {
            warn!(%error, "failed to initialise Prometheus metrics; continuing without");
            None
        }
    }
}
