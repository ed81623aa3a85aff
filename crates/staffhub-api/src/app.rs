//! Application wiring — builds every component and runs the server.

use std::sync::Arc;

use sqlx::PgPool;
use tracing::{info, warn};

use staffhub_access::clock::{ClockSource, ClockSynchronizer};
use staffhub_access::guard::AccessGuard;
use staffhub_access::identity::TokenDecoder;
use staffhub_access::session::{SessionControl, SessionManager};
use staffhub_access::window::AccessWindow;
use staffhub_core::config::AppConfig;
use staffhub_core::error::AppError;
use staffhub_database::repositories::audit::AuditRepository;
use staffhub_database::repositories::session::SessionRepository;
use staffhub_service::audit::AuditService;
use staffhub_service::session::SessionService;
use staffhub_worker::jobs::{ClockResyncJob, WindowSweepJob};

use crate::router::build_router;
use crate::state::AppState;

/// Runs the StaffHub server with the given configuration and database pool.
pub async fn run_server(config: AppConfig, db_pool: PgPool) -> Result<(), AppError> {
    info!("Starting StaffHub server...");

    // ── Step 1: Repositories ─────────────────────────────────────
    let session_repo = Arc::new(SessionRepository::new(db_pool.clone()));
    let audit_repo = Arc::new(AuditRepository::new(db_pool.clone()));

    // ── Step 2: Clock synchronization ────────────────────────────
    let clock = Arc::new(ClockSynchronizer::new(config.clock.clone())?);
    if let Err(e) = clock.sync().await {
        warn!(error = %e, "Initial clock sync failed; starting on local time");
    }
    let clock_source: Arc<dyn ClockSource> = clock.clone();

    // ── Step 3: Access window, sessions, guard ───────────────────
    let window = AccessWindow::from_config(&config.access)?;

    let session_manager = Arc::new(SessionManager::new(
        Arc::clone(&session_repo),
        Arc::clone(&clock_source),
        config.session.clone(),
    ));
    let session_control: Arc<dyn SessionControl> = session_manager.clone();

    let guard = Arc::new(AccessGuard::new(
        window,
        Arc::clone(&clock_source),
        session_control,
        config.access.recheck_interval_seconds,
    ));

    // ── Step 4: Services ─────────────────────────────────────────
    let session_service = Arc::new(SessionService::new(
        Arc::clone(&session_repo),
        Arc::clone(&session_manager),
        Arc::clone(&clock_source),
        config.session.clone(),
        window.utc_offset(),
    ));
    let audit_service = Arc::new(AuditService::new(Arc::clone(&audit_repo)));
    let token_decoder = Arc::new(TokenDecoder::new(&config.identity));

    // ── Step 5: Scheduled tasks ──────────────────────────────────
    let mut scheduler = staffhub_worker::CronScheduler::new(
        WindowSweepJob::new(Arc::clone(&guard)),
        ClockResyncJob::new(Arc::clone(&clock)),
    )
    .await?;
    scheduler.register_default_tasks().await?;
    scheduler.start().await?;

    // ── Step 6: Build and start HTTP server ──────────────────────
    let app_state = AppState {
        config: Arc::new(config.clone()),
        db_pool: db_pool.clone(),
        clock,
        token_decoder,
        session_manager,
        guard: Arc::clone(&guard),
        session_repo,
        audit_repo,
        session_service,
        audit_service,
    };

    let app = build_router(app_state);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    info!("StaffHub server listening on {}", addr);

    let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    // ── Step 7: Teardown ─────────────────────────────────────────
    info!("Shutdown signal received, stopping background work...");
    guard.shutdown();
    if let Err(e) = scheduler.shutdown().await {
        warn!(error = %e, "Scheduler shutdown failed");
    }

    info!("StaffHub server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
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
                warn!(error = %e, "Failed to install SIGTERM handler");
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
}
