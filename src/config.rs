use std::path::PathBuf;

use crate::error::Error;

pub const DEFAULT_MAX_CONTENT_CREATORS: usize = 8;
pub const DEFAULT_ROLES_FILE: &str = "user_roles.json";

/// Startup configuration, read once from the environment. Missing or
/// malformed required values abort the process before the client connects.
pub struct BotConfig {
    pub token: String,
    pub guild_id: u64,
    pub admin_id: u64,
    pub max_content_creators: usize,
    pub roles_file: PathBuf,
}

impl BotConfig {
    pub fn from_env() -> Result<Self, Error> {
        Ok(Self {
            token: require("DISCORD_TOKEN")?,
            guild_id: require_parsed("CHALLENGE_GUILD_ID")?,
            admin_id: require_parsed("ADMIN_USER_ID")?,
            max_content_creators: optional_parsed(
                "MAX_CONTENT_CREATORS",
                DEFAULT_MAX_CONTENT_CREATORS,
            )?,
            roles_file: std::env::var("ROLES_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_ROLES_FILE)),
        })
    }
}

fn require(key: &str) -> Result<String, Error> {
    std::env::var(key).map_err(|_| Error::Configuration(format!("{key} is not set")))
}

fn require_parsed<T: std::str::FromStr>(key: &str) -> Result<T, Error> {
    require(key)?
        .parse()
        .map_err(|_| Error::Configuration(format!("{key} is not a valid number")))
}

fn optional_parsed<T: std::str::FromStr>(key: &str, default: T) -> Result<T, Error> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| Error::Configuration(format!("{key} is not a valid number"))),
        Err(_) => Ok(default),
    }
}
