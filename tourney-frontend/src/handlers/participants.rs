use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use client_core::error::ApiError;
use client_core::identity::TokenKind;
use serde_json::Value;
use tower_sessions::Session;

use super::blocking_alert;
use super::tournaments::{rows_fragment, session_scope};
use crate::models::participant::Participant;
use crate::session::SessionContext;
use crate::views::ViewKey;
use crate::AppState;

/// Roster fragment for one division, shown inside the organizer's tournament
/// screens. Same guarded-fetch and stale-discard shape as the tournament
/// list.
pub async fn participant_list_fragment(
    State(state): State<AppState>,
    session: Session,
    mut ctx: SessionContext,
    Path(division_id): Path<i64>,
) -> Response {
    let key = ViewKey::new(
        session_scope(&session),
        format!("participants:{division_id}"),
    );
    let ticket = state.views.begin(key.clone());

    let division = division_id.to_string();
    match state
        .api
        .get_authed::<Vec<Participant>>(
            &ctx,
            TokenKind::Account,
            "/participants",
            &[("division_id", division.as_str())],
        )
        .await
    {
        Ok(items) => {
            let value = serde_json::to_value(&items).unwrap_or_else(|_| Value::Array(Vec::new()));
            state.views.commit(&ticket, value);
            rows_fragment(
                state.views.current(&key),
                "No participants in this division yet.",
            )
        }
        Err(ApiError::Business(message)) => blocking_alert(&message),
        Err(e) if e.is_token_rejection() => {
            ctx.clear_session(TokenKind::Account).await;
            Redirect::to(TokenKind::Account.entry_route()).into_response()
        }
        Err(ApiError::Unauthenticated(kind)) => Redirect::to(kind.entry_route()).into_response(),
        Err(e) => {
            tracing::error!(division_id, error = %e, "participant list fetch failed");
            rows_fragment(None, "Could not load participants, try again.")
        }
    }
}
