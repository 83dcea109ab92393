use askama::Template;
use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use client_core::error::ApiError;
use client_core::identity::TokenKind;
use serde::Deserialize;
use serde_json::Value;
use tower_sessions::Session;

use super::blocking_alert;
use crate::models::tournament::Tournament;
use crate::session::SessionContext;
use crate::views::ViewKey;
use crate::AppState;

#[derive(Template)]
#[template(path = "tournaments.html")]
pub struct TournamentsTemplate {
    pub account_name: String,
}

#[derive(Deserialize)]
pub struct TournamentListParams {
    #[serde(default)]
    pub tournament_name: String,
}

pub async fn tournaments_page(ctx: SessionContext) -> impl IntoResponse {
    let account_name = ctx
        .session(TokenKind::Account)
        .and_then(|r| r.display_name.clone())
        .unwrap_or_else(|| "Organizer".to_string());

    TournamentsTemplate { account_name }
}

/// HTMX fragment, re-fetched whenever the search box changes. A fetch that
/// loses the generation race renders nothing new: only the freshest
/// committed list ever surfaces.
pub async fn tournament_list_fragment(
    State(state): State<AppState>,
    session: Session,
    mut ctx: SessionContext,
    Query(params): Query<TournamentListParams>,
) -> Response {
    let key = ViewKey::new(session_scope(&session), "tournaments");
    let ticket = state.views.begin(key.clone());

    let filter = params.tournament_name.trim();
    let query: Vec<(&str, &str)> = if filter.is_empty() {
        Vec::new()
    } else {
        vec![("tournament_name", filter)]
    };

    match state
        .api
        .get_authed::<Vec<Tournament>>(&ctx, TokenKind::Account, "/tournaments", &query)
        .await
    {
        Ok(items) => {
            let value = serde_json::to_value(&items).unwrap_or_else(|_| Value::Array(Vec::new()));
            state.views.commit(&ticket, value);
            rows_fragment(state.views.current(&key), "No tournaments found.")
        }
        Err(ApiError::Business(message)) => blocking_alert(&message),
        Err(e) if e.is_token_rejection() => {
            ctx.clear_session(TokenKind::Account).await;
            Redirect::to(TokenKind::Account.entry_route()).into_response()
        }
        Err(ApiError::Unauthenticated(kind)) => Redirect::to(kind.entry_route()).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "tournament list fetch failed");
            rows_fragment(None, "Could not load tournaments, try again.")
        }
    }
}

/// Key listing state to the browser session so two visitors never share a
/// generation counter.
pub(crate) fn session_scope(session: &Session) -> String {
    session
        .id()
        .map(|id| id.to_string())
        .unwrap_or_else(|| "anonymous".to_string())
}

pub(crate) fn rows_fragment(items: Option<Value>, empty_message: &str) -> Response {
    let rows = match items {
        Some(Value::Array(rows)) if !rows.is_empty() => rows,
        _ => {
            return Html(format!(
                "<p class=\"empty\">{}</p>",
                super::escape(empty_message)
            ))
            .into_response();
        }
    };

    let mut out = String::from("<ul class=\"listing\">");
    for row in &rows {
        let name = row.get("name").and_then(Value::as_str).unwrap_or("(unnamed)");
        match row.get("location").and_then(Value::as_str) {
            Some(location) => out.push_str(&format!(
                "<li>{} <span class=\"muted\">{}</span></li>",
                super::escape(name),
                super::escape(location)
            )),
            None => out.push_str(&format!("<li>{}</li>", super::escape(name))),
        }
    }
    out.push_str("</ul>");

    Html(out).into_response()
}
