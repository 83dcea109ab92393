pub mod app;
pub mod auth;
pub mod dashboard;
pub mod metrics;
pub mod participants;
pub mod stream;
pub mod tournaments;
pub mod verify;

use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};

/// Answer an HTMX form submission with a client-side redirect.
pub(crate) fn hx_redirect(target: &str) -> Response {
    let mut headers = HeaderMap::new();
    if let Ok(value) = target.parse() {
        headers.insert("HX-Redirect", value);
    }
    (StatusCode::OK, headers, "").into_response()
}

/// Blocking alert fragment for business-level rejections.
pub(crate) fn blocking_alert(message: &str) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Html(format!(
            "<div class=\"alert\" role=\"alert\">{}</div>",
            escape(message)
        )),
    )
        .into_response()
}

/// Minimal HTML escaping for values interpolated into fragments.
pub(crate) fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_neutralizes_markup() {
        assert_eq!(escape("<b>\"x\" & y</b>"), "&lt;b&gt;&quot;x&quot; &amp; y&lt;/b&gt;");
    }
}
