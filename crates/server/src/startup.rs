use std::{future::Future, net::SocketAddr, path::Path, sync::Arc, time::Duration};

use axum::http::HeaderValue;
use configs::{AppConfig, CorsConfig, MailConfig};
use migration::MigratorTrait;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes::{self, auth::ServerState};
use service::mail::{HttpMailer, LogMailer, Mailer};

/// config.toml when present (path from CONFIG_PATH), otherwise env vars over defaults.
pub fn load_config() -> Result<AppConfig, StartupError> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    let mut cfg = if Path::new(&path).exists() {
        configs::load_from_file(&path).map_err(|e| StartupError::InvalidConfig(format!("{}: {}", path, e)))?
    } else {
        warn!(%path, "config file not found, using environment defaults");
        AppConfig::from_env()
    };
    cfg.normalize_and_validate()
        .map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    if cfg.auth.jwt_secret == configs::DEV_JWT_SECRET {
        warn!("JWT_SECRET not set, using the development secret");
    }
    Ok(cfg)
}

pub fn build_mailer(cfg: &MailConfig) -> Arc<dyn Mailer> {
    match cfg.endpoint.as_deref() {
        Some(endpoint) => {
            info!(%endpoint, "mail relay configured");
            Arc::new(HttpMailer::new(endpoint))
        }
        None => Arc::new(LogMailer),
    }
}

/// Empty origin list means permissive CORS.
pub fn build_cors(cfg: &CorsConfig) -> Result<CorsLayer, StartupError> {
    if cfg.allowed_origins.is_empty() {
        return Ok(CorsLayer::very_permissive());
    }
    let origins = cfg
        .allowed_origins
        .iter()
        .map(|o| HeaderValue::from_str(o).map_err(|_| StartupError::InvalidConfig(format!("invalid CORS origin: {}", o))))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}

/// Upper bound on waiting for queued mails once the listener has stopped.
pub const MAIL_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Public entry: migrate, build the app and serve it until `shutdown` resolves.
/// In-flight requests finish first, then pending mails get a bounded drain.
pub async fn run<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let db = models::db::connect_with_config(&cfg.database)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    migration::Migrator::up(&db, None)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    info!(event = "migrations_applied", "database schema up to date");

    let mailer = build_mailer(&cfg.mail);
    let state = ServerState::new(db, &cfg, mailer);
    let notifier = state.notifier.clone();
    let app = routes::build_router(state, build_cors(&cfg.cors)?);

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(%addr, strict_collaborations = cfg.collaboration.strict_transitions, "starting startup ocean api");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    serve(listener, app, shutdown).await?;

    info!(pending = notifier.pending(), "listener closed, draining mail queue");
    notifier.drain(MAIL_DRAIN_TIMEOUT).await;
    Ok(())
}

/// Serve `app` with peer addresses attached, stopping gracefully on `shutdown`.
pub async fn serve<F>(listener: tokio::net::TcpListener, app: axum::Router, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown)
        .await
}
