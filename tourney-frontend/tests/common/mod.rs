//! Shared harness: an in-process stub of the tournament API plus helpers for
//! driving the client router with a session cookie.
#![allow(dead_code)]

use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tourney_frontend::config::ApiSettings;
use tourney_frontend::services::api_client::ApiClient;
use tourney_frontend::startup::build_router;
use tourney_frontend::AppState;
use tower::util::ServiceExt;

#[derive(Default)]
pub struct UpstreamState {
    /// Every request the stub API received, any endpoint.
    pub hits: AtomicUsize,
    /// Code exchanges alone.
    pub verify_hits: AtomicUsize,
    /// When non-zero, the code exchange sleeps this long before answering.
    pub verify_delay_ms: AtomicU64,
    pub tournament_headers: Mutex<Option<HeaderMap>>,
    pub tournament_queries: Mutex<Vec<HashMap<String, String>>>,
    /// Per-division delays for the participant roster endpoint.
    pub participant_delays: Mutex<HashMap<String, u64>>,
}

async fn login_stub(
    State(state): State<Arc<UpstreamState>>,
    Json(body): Json<Value>,
) -> Json<Value> {
    state.hits.fetch_add(1, Ordering::SeqCst);
    if body["password"].as_str() == Some("letmein") {
        Json(json!({"token": "acct-token", "id": 1, "name": "Org"}))
    } else {
        Json(json!({"error": "invalid credentials"}))
    }
}

async fn logout_stub(State(state): State<Arc<UpstreamState>>) -> Json<Value> {
    state.hits.fetch_add(1, Ordering::SeqCst);
    Json(json!({}))
}

async fn verify_stub(
    State(state): State<Arc<UpstreamState>>,
    Json(body): Json<Value>,
) -> Json<Value> {
    state.hits.fetch_add(1, Ordering::SeqCst);
    state.verify_hits.fetch_add(1, Ordering::SeqCst);
    let delay = state.verify_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(std::time::Duration::from_millis(delay)).await;
    }
    match body["code"].as_str() {
        Some("123456") => Json(json!({"token": "abc", "id": 7, "name": "Alice"})),
        _ => Json(json!({"error": "invalid code"})),
    }
}

async fn tournaments_stub(
    State(state): State<Arc<UpstreamState>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    state.hits.fetch_add(1, Ordering::SeqCst);
    *state.tournament_headers.lock().unwrap() = Some(headers);
    state.tournament_queries.lock().unwrap().push(params.clone());

    match params.get("tournament_name") {
        Some(name) if !name.is_empty() => Json(json!([{"id": 1, "name": format!("{name} open")}])),
        _ => Json(json!([{"id": 1, "name": "all open"}])),
    }
}

async fn participants_stub(
    State(state): State<Arc<UpstreamState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    state.hits.fetch_add(1, Ordering::SeqCst);
    let division = params.get("division_id").cloned().unwrap_or_default();
    let delay = state
        .participant_delays
        .lock()
        .unwrap()
        .get(&division)
        .copied();
    if let Some(ms) = delay {
        tokio::time::sleep(std::time::Duration::from_millis(ms)).await;
    }
    Json(json!([{"name": format!("competitor d{division}")}]))
}

async fn spawn_upstream() -> (String, Arc<UpstreamState>) {
    let state = Arc::new(UpstreamState::default());

    let app = Router::new()
        .route("/login", post(login_stub))
        .route("/logout", post(logout_stub))
        .route("/participants/verify", post(verify_stub))
        .route("/tournaments", get(tournaments_stub))
        .route("/participants", get(participants_stub))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), state)
}

/// The client app wired to a fresh stub API.
pub async fn spawn_app() -> (Router, Arc<UpstreamState>) {
    let (base_url, upstream) = spawn_upstream().await;
    let api = Arc::new(
        ApiClient::new(ApiSettings {
            base_url,
            timeout_secs: 5,
        })
        .unwrap(),
    );
    (build_router(AppState::new(api)), upstream)
}

pub async fn get_with_cookie(app: &Router, uri: &str, cookie: Option<&str>) -> Response {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    app.clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post_form(app: &Router, uri: &str, body: &str, cookie: Option<&str>) -> Response {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    app.clone()
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

/// The session cookie pair from a response, ready to send back.
pub fn session_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

pub fn location(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

pub async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Log in through the app and hand back the session cookie.
pub async fn log_in(app: &Router) -> String {
    let response = post_form(
        app,
        "/login",
        "email=org%40example.com&password=letmein",
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    session_cookie(&response).expect("login should establish a session")
}
