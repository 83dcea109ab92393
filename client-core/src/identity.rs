use serde::{Deserialize, Serialize};
use std::fmt;

/// The two independent identity kinds a browser session can hold at once.
///
/// Storage keys, outbound header names, and entry routes are all derived from
/// the kind so call sites never repeat the literal strings. The remote API
/// treats the two header names as distinct namespaces; they must never be
/// interchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    Account,
    Participant,
}

impl TokenKind {
    /// Session-store key holding the bearer token for this kind.
    pub const fn storage_key(self) -> &'static str {
        match self {
            TokenKind::Account => "accessToken",
            TokenKind::Participant => "participantAccessToken",
        }
    }

    /// Outbound request header carrying the bearer token for this kind.
    pub const fn header_name(self) -> &'static str {
        match self {
            TokenKind::Account => "accessToken",
            TokenKind::Participant => "participantAccessToken",
        }
    }

    /// Where an unauthenticated user of this kind is sent.
    pub const fn entry_route(self) -> &'static str {
        match self {
            TokenKind::Account => "/login",
            TokenKind::Participant => "/verify",
        }
    }

    /// Session-store key holding the identity (account or participant id).
    pub const fn identity_key(self) -> &'static str {
        match self {
            TokenKind::Account => "accountIdentity",
            TokenKind::Participant => "participantIdentity",
        }
    }

    /// Session-store key holding the human-readable label, if any.
    pub const fn display_name_key(self) -> &'static str {
        match self {
            TokenKind::Account => "accountDisplayName",
            TokenKind::Participant => "participantDisplayName",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Account => write!(f, "account"),
            TokenKind::Participant => write!(f, "participant"),
        }
    }
}
