//! Skill Exchange API server.
//!
//! Composition root: loads configuration, connects PostgreSQL, wires the
//! use-case handlers against their adapters and serves the HTTP API.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::{net::TcpListener, signal};
use tower::ServiceBuilder;
use tower_http::{
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use skill_exchange::adapters::http::{app_router, AppState, CreditHandlers, SessionHandlers};
use skill_exchange::adapters::{
    DispatchingEventBus, JwtAccessTokenValidator, LogNotifier, PostgresCreditLedger,
    PostgresSessionRepository, PostgresUserDirectory, SystemClock,
};
use skill_exchange::application::{SessionNotificationHandler, NOTIFIED_EVENT_TYPES};
use skill_exchange::config::{AppConfig, LogFormat, ServerConfig};
use skill_exchange::ports::EventSubscriber;

const EVENT_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.server);
    config.validate().context("Invalid configuration")?;

    info!(
        environment = ?config.server.environment,
        timezone_offset_minutes = config.booking.timezone_offset_minutes,
        "Starting skill exchange"
    );

    let pool = config
        .database
        .pool_options()
        .connect(&config.database.url)
        .await
        .context("Failed to connect to PostgreSQL")?;

    if config.database.run_migrations {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run migrations")?;
        info!("Migrations applied");
    }

    let sessions = Arc::new(PostgresSessionRepository::new(pool.clone()));
    let users = Arc::new(PostgresUserDirectory::new(pool.clone()));
    let ledger = Arc::new(PostgresCreditLedger::new(pool));
    let clock = Arc::new(SystemClock);

    let (bus, event_worker) = DispatchingEventBus::spawn(config.server.event_queue_capacity);
    bus.subscribe_all(
        &NOTIFIED_EVENT_TYPES,
        Arc::new(SessionNotificationHandler::new(
            users.clone(),
            Arc::new(LogNotifier),
        )),
    );

    let state = AppState {
        auth: Arc::new(JwtAccessTokenValidator::new(
            &config.auth.jwt_secret,
            &config.auth.issuer,
            &config.auth.audience,
        )),
        sessions: SessionHandlers::new(
            sessions,
            users,
            bus.clone(),
            clock,
            config.booking.cancellation_policy()?,
        ),
        credits: CreditHandlers::new(ledger),
    };

    let app = app_router(state).layer(
        ServiceBuilder::new()
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                    .on_response(DefaultOnResponse::new().level(Level::INFO)),
            )
            .layer(TimeoutLayer::new(config.server.request_timeout())),
    );

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(address = %addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    // The router's clones are gone; dropping ours closes the queue.
    drop(bus);
    if tokio::time::timeout(EVENT_DRAIN_TIMEOUT, event_worker)
        .await
        .is_err()
    {
        tracing::warn!("Pending notifications not delivered before shutdown");
    }

    info!("Shutdown complete");
    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    match server.log_format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true),
            )
            .init(),
    }
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
