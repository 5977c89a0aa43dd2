use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serenity::all::UserId;
use serenity::http::Http;
use tokio::time::timeout;

use crate::error::Error;

const DELIVERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Outbound direct messages. Callers treat failures as best-effort: a failed
/// notification is logged, never fatal to the command that triggered it.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, user_id: u64, text: &str) -> Result<(), Error>;
}

/// Sends DMs through the Discord HTTP API.
pub struct DirectNotifier {
    http: Arc<Http>,
}

impl DirectNotifier {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Notifier for DirectNotifier {
    async fn notify(&self, user_id: u64, text: &str) -> Result<(), Error> {
        let send = async {
            let dm = UserId::new(user_id).create_dm_channel(&self.http).await?;
            dm.id.say(&self.http, text).await?;
            Ok::<_, serenity::Error>(())
        };
        match timeout(DELIVERY_TIMEOUT, send).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(Error::Delivery(format!("dm to {user_id}: {e}"))),
            Err(_) => Err(Error::Delivery(format!("dm to {user_id} timed out"))),
        }
    }
}
