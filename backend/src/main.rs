//! Backend entry-point: loads settings, prepares the database and serves the
//! pool REST endpoints.

mod server;

use std::io;

use actix_web::web;
#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetricsBuilder;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use pools::inbound::http::health::HealthState;
use pools::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use pools::settings::AppSettings;
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(|e| io::Error::other(e.to_string()))?;
    let database_url = settings.database_url().map_err(io::Error::other)?.to_owned();

    if settings.run_migrations() {
        run_pending_migrations(database_url.clone())
            .await
            .map_err(io::Error::other)?;
    } else {
        info!("skipping embedded migrations");
    }

    let pool_config = PoolConfig::new(database_url)
        .with_max_size(settings.db_max_connections().map_err(io::Error::other)?)
        .with_connection_timeout(settings.db_checkout_timeout());
    let db_pool = DbPool::new(pool_config).await.map_err(io::Error::other)?;

    let config = ServerConfig::new(settings.bind_addr()).with_db_pool(db_pool);
    #[cfg(feature = "metrics")]
    let config = config.with_metrics(make_metrics()?);

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    info!(bind_addr = %settings.bind_addr(), "pools server listening");
    server.await
}

#[cfg(feature = "metrics")]
fn make_metrics() -> io::Result<actix_web_prom::PrometheusMetrics> {
    PrometheusMetricsBuilder::new("pools")
        .endpoint("/metrics")
        .build()
        .map_err(|e| io::Error::other(format!("configure Prometheus metrics: {e}")))
}
