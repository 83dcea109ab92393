use askama::Template;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use client_core::error::ApiError;
use client_core::identity::TokenKind;

use super::blocking_alert;
use crate::models::tournament::StreamToken;
use crate::session::SessionContext;
use crate::AppState;

#[derive(Template)]
#[template(path = "stream.html")]
pub struct StreamTemplate {
    pub token: String,
    pub url: String,
}

/// Live-stream launch screen: fetches a fresh stream token for the
/// tournament and shows the launch credentials.
pub async fn stream_page(
    State(state): State<AppState>,
    mut ctx: SessionContext,
    Path(tournament_id): Path<i64>,
) -> Response {
    let path = format!("/tournaments/{tournament_id}/stream_token");

    match state
        .api
        .get_authed::<StreamToken>(&ctx, TokenKind::Account, &path, &[])
        .await
    {
        Ok(stream) => StreamTemplate {
            token: stream.token,
            url: stream.url.unwrap_or_default(),
        }
        .into_response(),
        Err(ApiError::Business(message)) => blocking_alert(&message),
        Err(e) if e.is_token_rejection() => {
            ctx.clear_session(TokenKind::Account).await;
            Redirect::to(TokenKind::Account.entry_route()).into_response()
        }
        Err(ApiError::Unauthenticated(kind)) => Redirect::to(kind.entry_route()).into_response(),
        Err(e) => {
            tracing::error!(tournament_id, error = %e, "stream token fetch failed");
            (
                StatusCode::BAD_GATEWAY,
                Html("<p class=\"error\">The stream is unavailable right now, try again.</p>"
                    .to_string()),
            )
                .into_response()
        }
    }
}
