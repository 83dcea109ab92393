//! Dual-identity session layer.
//!
//! The browser cookie addresses one durable session record which holds two
//! named bearer tokens, one per [`TokenKind`]. [`TokenStore`] is the durable
//! mirror; [`SessionContext`] is the in-memory owner for the life of one
//! request and the only writer. The two kinds are fully independent: a
//! client may hold neither, one, or both.

pub mod flow;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
};
use client_core::identity::TokenKind;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

/// An authenticated identity of one kind. Presence of the record is the
/// sole authority signal; `token` is always set when the record exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub identity: Option<String>,
    pub display_name: Option<String>,
    pub token: String,
}

impl SessionRecord {
    /// A record known only by its token, identity to be filled in later.
    pub fn bare(token: impl Into<String>) -> Self {
        Self {
            identity: None,
            display_name: None,
            token: token.into(),
        }
    }
}

/// Durable mirror of both bearer tokens, keyed per [`TokenKind`].
///
/// Storage failures never propagate: reads degrade to "absent", writes to a
/// no-op, each with a warning, so a broken session store logs the user out
/// rather than crashing the page.
#[derive(Clone)]
pub struct TokenStore {
    session: Session,
}

impl TokenStore {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub async fn get(&self, kind: TokenKind) -> Option<String> {
        match self.session.get::<String>(kind.storage_key()).await {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(kind = %kind, error = %e, "token read failed, treating as absent");
                None
            }
        }
    }

    pub async fn set(&self, kind: TokenKind, token: &str) {
        if let Err(e) = self.session.insert(kind.storage_key(), token).await {
            tracing::warn!(kind = %kind, error = %e, "token write failed");
        }
    }

    pub async fn clear(&self, kind: TokenKind) {
        if let Err(e) = self.session.remove::<String>(kind.storage_key()).await {
            tracing::warn!(kind = %kind, error = %e, "token clear failed");
        }
    }

    async fn get_field(&self, key: &str) -> Option<String> {
        match self.session.get::<String>(key).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "session read failed, treating as absent");
                None
            }
        }
    }

    async fn set_field(&self, key: &str, value: &str) {
        if let Err(e) = self.session.insert(key, value).await {
            tracing::warn!(key, error = %e, "session write failed");
        }
    }

    async fn clear_field(&self, key: &str) {
        if let Err(e) = self.session.remove::<String>(key).await {
            tracing::warn!(key, error = %e, "session clear failed");
        }
    }
}

/// In-memory owner of both session records, loaded from the [`TokenStore`]
/// once per request and mutated only through its setters, which write
/// through to durable storage so the two copies never diverge.
pub struct SessionContext {
    store: TokenStore,
    account: Option<SessionRecord>,
    participant: Option<SessionRecord>,
}

impl SessionContext {
    pub async fn load(session: Session) -> Self {
        let store = TokenStore::new(session);
        let account = Self::read(&store, TokenKind::Account).await;
        let participant = Self::read(&store, TokenKind::Participant).await;
        Self {
            store,
            account,
            participant,
        }
    }

    async fn read(store: &TokenStore, kind: TokenKind) -> Option<SessionRecord> {
        let token = store.get(kind).await?;
        Some(SessionRecord {
            identity: store.get_field(kind.identity_key()).await,
            display_name: store.get_field(kind.display_name_key()).await,
            token,
        })
    }

    pub fn session(&self, kind: TokenKind) -> Option<&SessionRecord> {
        match kind {
            TokenKind::Account => self.account.as_ref(),
            TokenKind::Participant => self.participant.as_ref(),
        }
    }

    pub fn is_active(&self, kind: TokenKind) -> bool {
        self.session(kind).is_some()
    }

    /// Replace one kind's record, mirroring the change into durable storage.
    /// The other kind is never touched.
    pub async fn set_session(&mut self, kind: TokenKind, record: SessionRecord) {
        self.store.set(kind, &record.token).await;
        match &record.identity {
            Some(identity) => self.store.set_field(kind.identity_key(), identity).await,
            None => self.store.clear_field(kind.identity_key()).await,
        }
        match &record.display_name {
            Some(name) => self.store.set_field(kind.display_name_key(), name).await,
            None => self.store.clear_field(kind.display_name_key()).await,
        }
        match kind {
            TokenKind::Account => self.account = Some(record),
            TokenKind::Participant => self.participant = Some(record),
        }
    }

    pub async fn clear_session(&mut self, kind: TokenKind) {
        self.store.clear(kind).await;
        self.store.clear_field(kind.identity_key()).await;
        self.store.clear_field(kind.display_name_key()).await;
        match kind {
            TokenKind::Account => self.account = None,
            TokenKind::Participant => self.participant = None,
        }
    }

}

#[async_trait]
impl<S> FromRequestParts<S> for SessionContext
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state).await.map_err(|_| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to extract session",
            )
                .into_response()
        })?;

        Ok(SessionContext::load(session).await)
    }
}
