use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::identity::TokenKind;

/// Failure taxonomy for every outbound API interaction.
///
/// `Unauthenticated` never reaches the network; `Business` is an
/// application-level rejection carried inside a successful transport
/// response; `Transport` covers everything between the client and a 2xx
/// answer; `Validation` is a local pre-network rejection. None of the
/// variants mutate session state themselves.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("no active {0} session")]
    Unauthenticated(TokenKind),

    #[error("{0}")]
    Business(String),

    #[error("transport failure: {message}")]
    Transport {
        status: Option<u16>,
        message: String,
    },

    #[error("{0}")]
    Validation(String),
}

impl ApiError {
    pub fn transport(message: impl Into<String>) -> Self {
        ApiError::Transport {
            status: None,
            message: message.into(),
        }
    }

    pub fn transport_status(status: u16, message: impl Into<String>) -> Self {
        ApiError::Transport {
            status: Some(status),
            message: message.into(),
        }
    }

    /// True when the upstream explicitly rejected the bearer token, meaning
    /// the caller should clear the session for that kind and let the guard
    /// redirect on the next evaluation.
    pub fn is_token_rejection(&self) -> bool {
        matches!(
            self,
            ApiError::Transport {
                status: Some(401),
                ..
            }
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorBody {
            error: String,
        }

        match self {
            ApiError::Unauthenticated(kind) => Redirect::to(kind.entry_route()).into_response(),
            ApiError::Business(message) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorBody { error: message }),
            )
                .into_response(),
            ApiError::Validation(message) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorBody { error: message }),
            )
                .into_response(),
            ApiError::Transport { status, message } => {
                tracing::error!(?status, %message, "upstream request failed");
                (
                    StatusCode::BAD_GATEWAY,
                    Json(ErrorBody {
                        error: "upstream request failed".to_string(),
                    }),
                )
                    .into_response()
            }
        }
    }
}
