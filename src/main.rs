use std::sync::Arc;

use serenity::all::Ready;
use serenity::async_trait;
use serenity::http::Http;
use serenity::model::channel::Message;
use serenity::prelude::*;
use tracing::{error, info};

mod commands;
mod config;
mod error;
mod gate;
mod notify;
mod roles;

use commands::router::CommandRouter;
use commands::Inbound;
use config::BotConfig;
use gate::GuildGate;
use notify::DirectNotifier;
use roles::assigner::RoleAssigner;
use roles::store::{JsonFileBackend, RoleStore};

struct Bot {
    // One command is fully processed before the next dispatches; the mutex
    // also keeps the count-check-and-upsert sequence atomic.
    router: Mutex<CommandRouter>,
}

#[async_trait]
impl EventHandler for Bot {
    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }

        let inbound = Inbound {
            user_id: msg.author.id.get(),
            username: Some(msg.author.name.clone()),
            text: msg.content.clone(),
        };

        let reply = self.router.lock().await.dispatch(&inbound).await;
        if let Some(reply) = reply {
            if let Err(e) = msg.channel_id.say(&ctx.http, reply).await {
                error!("Error sending reply: {e:?}");
            }
        }
    }

    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!("{} is connected!", ready.user.name);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = BotConfig::from_env()?;

    // Corrupt state aborts startup; never silently drop assignments.
    let store = RoleStore::load(Box::new(JsonFileBackend::new(config.roles_file.clone())))?;

    let http = Arc::new(Http::new(&config.token));
    let router = CommandRouter::new(
        store,
        RoleAssigner::default(),
        Box::new(GuildGate::new(http.clone(), config.guild_id)),
        Box::new(DirectNotifier::new(http)),
        config.admin_id,
        config.max_content_creators,
    );

    let intents = GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(&config.token, intents)
        .event_handler(Bot {
            router: Mutex::new(router),
        })
        .await?;

    client.start().await?;
    Ok(())
}
