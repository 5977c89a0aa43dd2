use thiserror::Error;

/// Everything that can go wrong in the bot, split by how it is handled:
/// `Configuration` and `CorruptState` abort startup, the rest are caught at
/// the command boundary and turned into user-facing replies.
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("corrupt state in {path}: {detail}")]
    CorruptState { path: String, detail: String },

    #[error("failed to persist role state: {0}")]
    Persistence(#[source] std::io::Error),

    #[error("membership lookup failed: {0}")]
    Lookup(String),

    #[error("message delivery failed: {0}")]
    Delivery(String),

    #[error("invalid command arguments: {0}")]
    Validation(String),
}
