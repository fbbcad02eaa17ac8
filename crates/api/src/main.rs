use std::net::SocketAddr;
use std::sync::Arc;

use roadwatch_core::ports::MailTransport;
use roadwatch_core::report::ReportService;
use roadwatch_db::stores::{PgAccidentStore, PgUserStore};
use roadwatch_notify::delivery::email::DEFAULT_FROM_ADDRESS;
use roadwatch_notify::{EmailConfig, EmailDelivery};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use roadwatch_api::config::ServerConfig;
use roadwatch_api::router::build_app_router;
use roadwatch_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roadwatch_api=debug,roadwatch_core=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = roadwatch_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    roadwatch_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    roadwatch_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Mail relay ---
    let email_config = EmailConfig::from_env();
    let sender = email_config
        .as_ref()
        .map_or_else(|| DEFAULT_FROM_ADDRESS.to_string(), |c| c.from_address.clone());
    let mailer: Option<Arc<dyn MailTransport>> = match &email_config {
        Some(cfg) => {
            let delivery: Arc<dyn MailTransport> =
                Arc::new(EmailDelivery::new(cfg).expect("Invalid SMTP relay configuration"));
            tracing::info!(host = %cfg.smtp_host, port = cfg.smtp_port, "SMTP relay configured");
            Some(delivery)
        }
        None => {
            tracing::warn!("SMTP_HOST not set, accident summaries will not be emailed");
            None
        }
    };

    // --- App state ---
    let reports = ReportService::new(Arc::new(PgAccidentStore::new(pool.clone())), mailer, sender);
    let state = AppState {
        config: Arc::new(config.clone()),
        reports: Arc::new(reports),
        users: Arc::new(PgUserStore::new(pool)),
    };

    let app = build_app_router(state, &config).expect("Invalid CORS_ORIGINS");

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
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
