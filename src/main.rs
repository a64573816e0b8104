//! Session Share server entry point.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use session_share::adapters::http::app_router;
use session_share::adapters::http::middleware::SessionLayerState;
use session_share::adapters::http::sharing::SharingState;
use session_share::adapters::session_store::RedisSessionStore;
use session_share::config::{AppConfig, ServerConfig};
use session_share::ports::SessionStore;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config.server);

    let addr = config.server.socket_addr()?;
    tracing::info!(
        environment = ?config.server.environment,
        port = config.server.port,
        "Starting session-share"
    );

    let store = connect_store(&config).await?;
    let sessions = SessionLayerState::new(
        store,
        config.session.cookie_name.clone(),
        config.session.max_inactive(),
        config.secure_cookie(),
    );
    let app = app_router(
        SharingState::new(config.server.port),
        sessions,
        config.server.request_timeout(),
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Structured JSON logs in production, human-readable otherwise.
/// `RUST_LOG` overrides the configured filter.
fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    if server.is_production() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn connect_store(config: &AppConfig) -> Result<Arc<dyn SessionStore>, BoxError> {
    let client = config.redis.client()?;

    let conn = tokio::time::timeout(
        config.redis.timeout(),
        client.get_multiplexed_tokio_connection(),
    )
    .await
    .map_err(|_| format!("Timed out connecting to Redis after {:?}", config.redis.timeout()))??;

    tracing::info!(
        redis = %config.redis.redacted_url(),
        namespace = %config.session.namespace,
        "Connected to Redis session store"
    );

    Ok(Arc::new(RedisSessionStore::new(
        conn,
        config.session.namespace.clone(),
        config.session.max_inactive(),
    )))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
