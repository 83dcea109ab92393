use serde::{Deserialize, Serialize};

use super::Identity;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tournament {
    pub id: Identity,
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
}

/// Live-stream launch credentials for one tournament.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamToken {
    pub token: String,
    #[serde(default)]
    pub url: Option<String>,
}
