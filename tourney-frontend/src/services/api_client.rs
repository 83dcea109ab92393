//! HTTP client for the tournament API.
//!
//! Authorized calls attach exactly one bearer header, named for the identity
//! kind that issued them, and fail fast without touching the network when the
//! session context holds no record of that kind. A `{error}` payload inside a
//! 2xx response is a business rejection, everything else non-2xx is a
//! transport failure. The client never mutates session state, not even on a
//! 401; that is the caller's job.

use anyhow::Result;
use client_core::error::ApiError;
use client_core::identity::TokenKind;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

use crate::config::ApiSettings;
use crate::models::AuthGrant;
use crate::session::SessionContext;

pub struct ApiClient {
    http: Client,
    settings: ApiSettings,
}

impl ApiClient {
    pub fn new(settings: ApiSettings) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;

        Ok(Self { http, settings })
    }

    /// Authorized GET. Fails fast with `Unauthenticated` before any network
    /// traffic when the context holds no session of `kind`.
    pub async fn get_authed<T: DeserializeOwned>(
        &self,
        ctx: &SessionContext,
        kind: TokenKind,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let request = self.authorized(ctx, kind, Method::GET, path)?.query(query);
        Self::execute(request, path).await
    }

    /// Authorized POST with a JSON body. Same preconditions as
    /// [`Self::get_authed`].
    pub async fn post_authed<T: DeserializeOwned>(
        &self,
        ctx: &SessionContext,
        kind: TokenKind,
        path: &str,
        body: &Value,
    ) -> Result<T, ApiError> {
        let request = self.authorized(ctx, kind, Method::POST, path)?.json(body);
        Self::execute(request, path).await
    }

    fn authorized(
        &self,
        ctx: &SessionContext,
        kind: TokenKind,
        method: Method,
        path: &str,
    ) -> Result<reqwest::RequestBuilder, ApiError> {
        let record = ctx.session(kind).ok_or(ApiError::Unauthenticated(kind))?;
        let url = format!("{}{}", self.settings.base_url, path);
        Ok(self
            .http
            .request(method, url)
            .header(kind.header_name(), record.token.as_str()))
    }

    /// Exchange a one-time code for a participant bearer token. The one
    /// unauthenticated participant endpoint.
    pub async fn verify_code(
        &self,
        participant_id: i64,
        code: &str,
    ) -> Result<AuthGrant, ApiError> {
        let body = serde_json::json!({ "code": code, "participant_id": participant_id });
        let request = self
            .http
            .post(format!("{}/participants/verify", self.settings.base_url))
            .json(&body);
        Self::execute(request, "/participants/verify").await
    }

    /// Account login; answers with the same `{token, id, name}` shape as the
    /// verification exchange.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthGrant, ApiError> {
        let body = serde_json::json!({ "email": email, "password": password });
        let request = self
            .http
            .post(format!("{}/login", self.settings.base_url))
            .json(&body);
        Self::execute(request, "/login").await
    }

    async fn execute<T: DeserializeOwned>(
        request: reqwest::RequestBuilder,
        path: &str,
    ) -> Result<T, ApiError> {
        let response = request.send().await.map_err(|e| {
            tracing::error!(path, error = %e, "request failed to reach the API");
            ApiError::transport(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(path, status = status.as_u16(), "API answered with an error status");
            return Err(ApiError::transport_status(
                status.as_u16(),
                format!("status {status}"),
            ));
        }

        let value: Value = response
            .json()
            .await
            .map_err(|e| ApiError::transport(format!("unreadable response body: {e}")))?;

        // Business rejections ride inside successful transport responses.
        if let Some(message) = value.get("error").and_then(Value::as_str) {
            return Err(ApiError::Business(message.to_string()));
        }

        serde_json::from_value(value)
            .map_err(|e| ApiError::transport(format!("malformed response body: {e}")))
    }
}
