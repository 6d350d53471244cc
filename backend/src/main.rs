//! Storefront entry-point: loads settings, prepares storage, and serves the
//! REST API.

mod server;

use std::ffi::OsString;
use std::time::Duration;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use url::Url;

use server::{MailTransport, ServerConfig, create_server};
use storefront::inbound::http::health::HealthState;
use storefront::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use storefront::settings::AppSettings;

/// How long shutdown waits for queued notifications to drain.
const WORKER_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

fn io_error(context: &str, err: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(format!("{context}: {err}"))
}

async fn server_config(settings: &AppSettings) -> std::io::Result<ServerConfig> {
    let bind_addr = settings
        .bind_addr()
        .map_err(|err| io_error("invalid bind address", err))?;
    let mut config = ServerConfig::new(bind_addr)
        .with_payment_delay(settings.payment_delay())
        .with_notification_sender(settings.notification_sender())
        .with_delivery_policy(settings.delivery_policy())
        .with_queue_capacity(settings.queue_capacity());

    if let Some(raw) = settings.mail_relay_url() {
        let endpoint = Url::parse(raw).map_err(|err| io_error("invalid mail relay URL", err))?;
        config = config.with_mail_transport(MailTransport::Relay {
            endpoint,
            timeout: settings.mail_relay_timeout(),
        });
    }

    if let Some(url) = settings.database_url() {
        let applied = run_pending_migrations(url)
            .await
            .map_err(|err| io_error("database migration failed", err))?;
        info!(applied, "database schema up to date");
        let mut pool_config = PoolConfig::new(url);
        if let Some(size) = settings.database_pool_size {
            pool_config = pool_config.with_max_size(size);
        }
        let pool = DbPool::new(pool_config)
            .await
            .map_err(|err| io_error("database pool", err))?;
        config = config.with_db_pool(pool);
    }

    #[cfg(feature = "metrics")]
    let config = config.with_metrics(server::build_prometheus());

    Ok(config)
}

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

    let settings = AppSettings::load_from_iter(std::env::args_os().collect::<Vec<OsString>>())
        .map_err(|err| io_error("failed to load settings", err))?;
    let config = server_config(&settings).await?;
    info!(bind_addr = %config.bind_addr(), "starting storefront");

    let health_state = web::Data::new(HealthState::new());
    let running = create_server(health_state.clone(), config)?;
    let result = running.server.await;
    health_state.mark_unhealthy();

    match tokio::time::timeout(WORKER_DRAIN_TIMEOUT, running.notification_worker).await {
        Ok(Ok(processed)) => info!(processed, "notification worker drained"),
        Ok(Err(err)) => warn!(error = %err, "notification worker panicked"),
        Err(_) => warn!("notification worker did not drain before shutdown"),
    }
    result
}
