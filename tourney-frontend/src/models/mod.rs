pub mod participant;
pub mod tournament;

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque identifier the API may send as a number or a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identity {
    Number(i64),
    Text(String),
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identity::Number(n) => write!(f, "{n}"),
            Identity::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Result of the account login and of the participant code exchange: the
/// bearer token plus the identity it belongs to.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthGrant {
    pub token: String,
    pub id: Identity,
    #[serde(default)]
    pub name: Option<String>,
}
