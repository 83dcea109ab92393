use askama::Template;
use axum::response::IntoResponse;
use client_core::identity::TokenKind;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub organizer_route: &'static str,
    pub participant_route: &'static str,
}

/// Landing page offering both ways in: the organizer login and the
/// participant code entry.
pub async fn index() -> impl IntoResponse {
    IndexTemplate {
        organizer_route: TokenKind::Account.entry_route(),
        participant_route: TokenKind::Participant.entry_route(),
    }
}

pub async fn health_check() -> &'static str {
    "OK"
}
