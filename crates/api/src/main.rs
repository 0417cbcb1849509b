use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use timeline_api::background::session_cleanup;
use timeline_api::config::ServerConfig;
use timeline_api::router::build_app_router;
use timeline_api::state::AppState;
use timeline_events::{EmailConfig, EmailDelivery, EmailNotifier, EventBus, MilestoneDueSweep};
use tokio_util::sync::CancellationToken;

const DEFAULT_DATABASE_URL: &str = "sqlite://timeline.db";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    timeline_api::logging::init("timeline_api=debug,timeline_events=info,tower_http=debug");

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

    let pool = timeline_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    timeline_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    timeline_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Event bus and background jobs ---
    let event_bus = Arc::new(EventBus::default());
    let cancel = CancellationToken::new();
    let mut tasks = Vec::new();

    match EmailConfig::from_env().map(|cfg| (EmailDelivery::new(&cfg), cfg.smtp_host)) {
        Some((Ok(delivery), smtp_host)) => {
            tracing::info!(%smtp_host, "Email delivery enabled");
            let notifier = EmailNotifier::new(pool.clone(), delivery);
            tasks.push(tokio::spawn(
                notifier.run(event_bus.subscribe(), cancel.clone()),
            ));
        }
        Some((Err(e), smtp_host)) => {
            tracing::error!(error = %e, %smtp_host, "Email misconfigured, delivery disabled");
        }
        None => tracing::info!("SMTP_HOST not set, email delivery disabled"),
    }

    let sweep = MilestoneDueSweep::new(
        pool.clone(),
        Arc::clone(&event_bus),
        config.milestone_due_window_days,
    );
    let sweep_interval = Duration::from_secs(config.milestone_sweep_interval_secs);
    let sweep_cancel = cancel.clone();
    tasks.push(tokio::spawn(async move {
        sweep.run(sweep_interval, sweep_cancel).await;
    }));

    tasks.push(tokio::spawn(session_cleanup::run(
        pool.clone(),
        Duration::from_secs(config.session_cleanup_interval_secs),
        cancel.clone(),
    )));

    // --- Router ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        event_bus,
    };
    let app = build_app_router(state, &config);

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

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, stopping background jobs");
    cancel.cancel();

    let grace = Duration::from_secs(config.shutdown_timeout_secs);
    for task in tasks {
        if tokio::time::timeout(grace, task).await.is_err() {
            tracing::warn!("Background job did not stop within the shutdown timeout");
        }
    }

    tracing::info!("Graceful shutdown complete");
}

/// Resolve on SIGINT, or SIGTERM on Unix.
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
