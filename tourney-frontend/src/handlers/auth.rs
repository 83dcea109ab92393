use askama::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form,
};
use client_core::error::ApiError;
use client_core::identity::TokenKind;
use serde::Deserialize;
use validator::Validate;

use super::hx_redirect;
use crate::session::{SessionContext, SessionRecord};
use crate::AppState;

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {}

#[derive(Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

pub async fn login_page() -> impl IntoResponse {
    LoginTemplate {}
}

pub async fn login_handler(
    State(state): State<AppState>,
    mut ctx: SessionContext,
    Form(payload): Form<LoginRequest>,
) -> Response {
    // Local validation never reaches the network.
    if let Err(errors) = payload.validate() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Html(format!(
                "<p class=\"error\">{}</p>",
                super::escape(&first_message(&errors))
            )),
        )
            .into_response();
    }

    match state.api.login(&payload.email, &payload.password).await {
        Ok(grant) => {
            let record = SessionRecord {
                identity: Some(grant.id.to_string()),
                display_name: grant.name.clone(),
                token: grant.token.clone(),
            };
            ctx.set_session(TokenKind::Account, record).await;

            tracing::info!(account = %grant.id, "account logged in");
            hx_redirect("/dashboard")
        }
        Err(ApiError::Business(message)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Html(format!("<p class=\"error\">{}</p>", super::escape(&message))),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "login request failed");
            (
                StatusCode::BAD_GATEWAY,
                Html("<p class=\"error\">Login is unavailable right now, try again.</p>".to_string()),
            )
                .into_response()
        }
    }
}

pub async fn logout_handler(State(state): State<AppState>, mut ctx: SessionContext) -> Response {
    // Revocation is best effort; the local session is cleared regardless.
    if ctx.is_active(TokenKind::Account) {
        if let Err(e) = state
            .api
            .post_authed::<serde_json::Value>(
                &ctx,
                TokenKind::Account,
                "/logout",
                &serde_json::json!({}),
            )
            .await
        {
            tracing::warn!(error = %e, "token revocation failed during logout");
        }
    }

    ctx.clear_session(TokenKind::Account).await;
    hx_redirect("/")
}

fn first_message(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|list| list.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Invalid input".to_string())
}
