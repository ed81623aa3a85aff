//! Route definitions for the StaffHub HTTP API.
//!
//! All routes are organized by concern and mounted under `/api`. Window
//! enforcement wraps every authenticated route except `/access/state` and
//! `/sessions/close`: a denied user must still be able to observe the wait
//! time, and closing a session is always safe.

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::middleware::cors::build_cors_layer;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    // Privileged writes get the audit interceptor.
    let audited_admin_writes = Router::new()
        .route(
            "/admin/sessions/{id}/close",
            post(handlers::admin::sessions::close_session),
        )
        .route(
            "/admin/users/{id}/sessions/close",
            post(handlers::admin::sessions::close_user_sessions),
        )
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::audit::capture_audit,
        ));

    let window_gated = Router::new()
        .route("/sessions/open", post(handlers::session::open_session))
        .route(
            "/admin/sessions/active",
            get(handlers::admin::sessions::list_active),
        )
        .route("/admin/sessions", get(handlers::admin::sessions::history))
        .route(
            "/admin/users/{id}/sessions/active",
            get(handlers::admin::sessions::list_active_for_user),
        )
        .route("/admin/audit", get(handlers::admin::audit::search_audit))
        .merge(audited_admin_writes)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::access::enforce_access_window,
        ));

    let ungated = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/access/state", get(handlers::access::access_state))
        .route("/sessions/close", post(handlers::session::close_session));

    let cors = build_cors_layer(&state.config.server.cors);

    Router::new()
        .nest("/api", ungated.merge(window_gated))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}
