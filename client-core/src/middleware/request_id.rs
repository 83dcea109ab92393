use axum::http::{HeaderName, HeaderValue};
use axum::{extract::Request, middleware::Next, response::Response};
use uuid::Uuid;

pub static REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Reuse the caller-supplied request id or mint one, and echo it back on the
/// response so log lines can be correlated between the client and the API.
pub async fn request_id_middleware(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get(&REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    match HeaderValue::from_str(&id) {
        Ok(value) => {
            req.headers_mut().insert(&REQUEST_ID, value.clone());
            let mut response = next.run(req).await;
            response.headers_mut().insert(&REQUEST_ID, value);
            response
        }
        // A malformed inbound id is dropped rather than propagated.
        Err(_) => next.run(req).await,
    }
}
