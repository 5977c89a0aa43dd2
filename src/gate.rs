use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serenity::all::{GuildId, Member, UserId};
use serenity::http::Http;
use tokio::time::timeout;
use tracing::error;

use crate::error::Error;

/// How long a membership lookup may wait before it counts as a failure.
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Membership check against the channel that gates the challenge. Lookup
/// errors are treated as "not a member" (fail closed), never propagated.
#[async_trait]
pub trait SubscriptionGate: Send + Sync {
    async fn is_member(&self, user_id: u64) -> bool;

    /// Best-effort display-name resolution for manual grants; `None` when the
    /// user cannot be looked up.
    async fn display_name(&self, user_id: u64) -> Option<String>;
}

/// Gate backed by the Discord guild the challenge runs in: anyone the API
/// reports as a guild member passes.
pub struct GuildGate {
    http: Arc<Http>,
    guild_id: GuildId,
}

impl GuildGate {
    pub fn new(http: Arc<Http>, guild_id: u64) -> Self {
        Self {
            http,
            guild_id: GuildId::new(guild_id),
        }
    }

    async fn fetch_member(&self, user_id: u64) -> Result<Member, Error> {
        let lookup = self.guild_id.member(&self.http, UserId::new(user_id));
        match timeout(LOOKUP_TIMEOUT, lookup).await {
            Ok(Ok(member)) => Ok(member),
            Ok(Err(e)) => Err(Error::Lookup(format!("member {user_id}: {e}"))),
            Err(_) => Err(Error::Lookup(format!("member {user_id}: timed out"))),
        }
    }
}

#[async_trait]
impl SubscriptionGate for GuildGate {
    async fn is_member(&self, user_id: u64) -> bool {
        match self.fetch_member(user_id).await {
            Ok(_) => true,
            Err(e) => {
                error!("subscription check failed, treating as not a member: {e}");
                false
            }
        }
    }

    async fn display_name(&self, user_id: u64) -> Option<String> {
        self.fetch_member(user_id)
            .await
            .ok()
            .map(|member| member.user.name.clone())
    }
}
