use std::net::SocketAddr;
use std::sync::Arc;

use lms_backend::config::{init_db, Config};
use lms_backend::modules::auth::crud::{SessionCrud, UserCrud};
use lms_backend::services::clock::SystemClock;
use lms_backend::AppState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lms_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!(environment = %config.server.environment, "configuration loaded");

    let db = init_db(&config.database).await?;
    tracing::info!("Connected to MySQL");

    sqlx::migrate!("./migrations").run(&db).await?;
    tracing::info!("Migrations applied");

    tokio::fs::create_dir_all(&config.storage.upload_path).await?;

    let state = AppState::new(
        &config,
        Arc::new(UserCrud::new(db.clone())),
        Arc::new(SessionCrud::new(db.clone())),
        Arc::new(SystemClock),
    )?;

    let app = lms_backend::create_app(state, &config);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Server running");

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped accepting connections, closing database pool");
    db.close().await;
    tracing::info!("Graceful shutdown complete");

    Ok(())
}

/// Resolves on SIGINT, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl-C handler");
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
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
