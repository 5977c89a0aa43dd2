pub mod assigner;
pub mod store;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Outcome a participant can hold. Content creators are capped; spectators
/// are the default majority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    ContentCreator,
    Spectator,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::ContentCreator => write!(f, "content_creator"),
            Role::Spectator => write!(f, "spectator"),
        }
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "content_creator" => Ok(Role::ContentCreator),
            "spectator" => Ok(Role::Spectator),
            other => Err(Error::Validation(format!(
                "role must be 'content_creator' or 'spectator', got '{other}'"
            ))),
        }
    }
}

/// Fallback when the platform exposes no username for a user.
pub const UNKNOWN_NAME: &str = "NoUsername";

/// One user's stored outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleAssignment {
    pub user_id: u64,
    pub display_name: String,
    pub role: Role,
}
