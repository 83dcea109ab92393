use serde::{Deserialize, Serialize};

use super::Identity;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    #[serde(default)]
    pub id: Option<Identity>,
    pub name: String,
    #[serde(default)]
    pub club: Option<String>,
}
