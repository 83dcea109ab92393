use askama::Template;
use axum::response::IntoResponse;
use client_core::identity::TokenKind;

use crate::session::SessionContext;

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub display_name: String,
}

#[derive(Template)]
#[template(path = "participant_dashboard.html")]
pub struct ParticipantDashboardTemplate {
    pub display_name: String,
}

pub async fn dashboard_handler(ctx: SessionContext) -> impl IntoResponse {
    let display_name = ctx
        .session(TokenKind::Account)
        .and_then(|r| r.display_name.clone())
        .unwrap_or_else(|| "Organizer".to_string());

    DashboardTemplate { display_name }
}

pub async fn participant_dashboard(ctx: SessionContext) -> impl IntoResponse {
    let display_name = ctx
        .session(TokenKind::Participant)
        .and_then(|r| r.display_name.clone())
        .unwrap_or_else(|| "Competitor".to_string());

    ParticipantDashboardTemplate { display_name }
}
