use axum::{middleware::from_fn, routing::get, Router};
use client_core::middleware::request_id::request_id_middleware;
use time::Duration;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::handlers::{
    app::{health_check, index},
    auth::{login_handler, login_page, logout_handler},
    dashboard::{dashboard_handler, participant_dashboard},
    participants::participant_list_fragment,
    stream::stream_page,
    tournaments::{tournament_list_fragment, tournaments_page},
    verify::{verify_handler, verify_page},
};
use crate::middleware::auth::{require_account, require_participant};
use crate::services::metrics::metrics_middleware;
use crate::AppState;

pub fn build_router(state: AppState) -> Router {
    // Session setup
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false) // Set to true in production with HTTPS
        .with_expiry(Expiry::OnInactivity(Duration::hours(24)));

    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/metrics", get(crate::handlers::metrics::metrics))
        .route("/login", get(login_page).post(login_handler))
        .route("/logout", get(logout_handler))
        .route("/verify", get(verify_page).post(verify_handler))
        .route(
            "/dashboard",
            get(dashboard_handler).layer(from_fn(require_account)),
        )
        .route(
            "/tournaments",
            get(tournaments_page).layer(from_fn(require_account)),
        )
        .route(
            "/tournaments/list",
            get(tournament_list_fragment).layer(from_fn(require_account)),
        )
        .route(
            "/tournaments/:id/stream",
            get(stream_page).layer(from_fn(require_account)),
        )
        .route(
            "/divisions/:id/participants",
            get(participant_list_fragment).layer(from_fn(require_account)),
        )
        .route(
            "/participant/dashboard",
            get(participant_dashboard).layer(from_fn(require_participant)),
        )
        .nest_service("/static", ServeDir::new("tourney-frontend/static"))
        .layer(session_layer)
        .layer(from_fn(metrics_middleware))
        // Add tracing layer
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        // Add tracing middleware for request_id
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}
