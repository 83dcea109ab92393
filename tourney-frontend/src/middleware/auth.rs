use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use client_core::identity::TokenKind;
use tower_sessions::Session;

use crate::services::metrics::observe_guard_redirect;
use crate::session::TokenStore;

/// View-level gate. When no session of the required kind is present the
/// protected handler never runs, so its fetch side effect never fires, and
/// the browser is sent to the kind's entry route.
async fn require_session(
    kind: TokenKind,
    session: Session,
    request: Request,
    next: Next,
) -> Response {
    let store = TokenStore::new(session);
    if store.get(kind).await.is_none() {
        observe_guard_redirect(&kind.to_string());
        return Redirect::to(kind.entry_route()).into_response();
    }
    next.run(request).await
}

pub async fn require_account(session: Session, request: Request, next: Next) -> Response {
    require_session(TokenKind::Account, session, request, next).await
}

pub async fn require_participant(session: Session, request: Request, next: Next) -> Response {
    require_session(TokenKind::Participant, session, request, next).await
}
