use askama::Template;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form,
};
use client_core::error::ApiError;
use client_core::identity::TokenKind;
use serde::Deserialize;
use tower_sessions::Session;

use super::hx_redirect;
use crate::session::flow::{SubmitRejection, VerificationFlow, FLOW_KEY};
use crate::session::{SessionContext, SessionRecord};
use crate::AppState;

#[derive(Template)]
#[template(path = "verify.html")]
pub struct VerifyTemplate {
    pub participant_id: i64,
}

#[derive(Deserialize)]
pub struct VerifyPageParams {
    /// Supplied by the invitation link that brought the participant here.
    #[serde(default)]
    pub participant_id: i64,
}

#[derive(Deserialize)]
pub struct VerifyRequest {
    pub participant_id: i64,
    pub code: String,
}

pub async fn verify_page(Query(params): Query<VerifyPageParams>) -> impl IntoResponse {
    VerifyTemplate {
        participant_id: params.participant_id,
    }
}

/// Exchange the one-time code for a participant bearer token.
///
/// On success the durable token is written first, then the in-memory
/// session, then the flow is marked succeeded and navigation fires. A
/// rejected exchange leaves both untouched; no partial session is ever
/// created.
pub async fn verify_handler(
    State(state): State<AppState>,
    session: Session,
    Form(payload): Form<VerifyRequest>,
) -> Response {
    let mut flow: VerificationFlow = session
        .get(FLOW_KEY)
        .await
        .ok()
        .flatten()
        .unwrap_or_default();

    let code = match flow.begin(&payload.code) {
        Ok(code) => code,
        Err(SubmitRejection::EmptyCode) => {
            save_flow(&session, &flow).await;
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Html("<p class=\"error\">Enter your verification code.</p>".to_string()),
            )
                .into_response();
        }
        Err(SubmitRejection::InFlight) => {
            // A previous submission is still being exchanged.
            return (
                StatusCode::OK,
                Html("<p class=\"pending\">Still checking your code.</p>".to_string()),
            )
                .into_response();
        }
    };
    // The session layer only writes the store once the response completes;
    // flush now so a duplicate submission on this session finds the
    // in-flight flow.
    save_flow(&session, &flow).await;
    if let Err(e) = session.save().await {
        tracing::warn!(error = %e, "could not flush in-flight verification state");
    }

    let mut ctx = SessionContext::load(session.clone()).await;

    match state.api.verify_code(payload.participant_id, &code).await {
        Ok(grant) => {
            let record = SessionRecord {
                identity: Some(grant.id.to_string()),
                display_name: grant.name.clone(),
                token: grant.token.clone(),
            };
            // Durable token first, then the in-memory session, then
            // navigation.
            ctx.set_session(TokenKind::Participant, record).await;
            flow.succeed();
            save_flow(&session, &flow).await;

            tracing::info!(participant = %grant.id, "participant verified");
            hx_redirect("/participant/dashboard")
        }
        Err(ApiError::Business(message)) => {
            flow.fail(message.clone());
            save_flow(&session, &flow).await;
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Html(format!("<p class=\"error\">{}</p>", super::escape(&message))),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "verification exchange failed");
            flow.fail("Verification is unavailable right now, try again.");
            save_flow(&session, &flow).await;
            (
                StatusCode::BAD_GATEWAY,
                Html(
                    "<p class=\"error\">Verification is unavailable right now, try again.</p>"
                        .to_string(),
                ),
            )
                .into_response()
        }
    }
}

async fn save_flow(session: &Session, flow: &VerificationFlow) {
    if let Err(e) = session.insert(FLOW_KEY, flow).await {
        tracing::warn!(error = %e, "could not persist verification flow");
    }
}
