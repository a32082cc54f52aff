use std::time::Duration;

use clap::{Parser, crate_name};
use serde::Serialize;
use ureq::Agent;

use crate::prelude::*;

#[derive(Parser)]
pub struct DiscordArgs {
    #[clap(long = "discord-webhook-url", env = "DISCORD_WEBHOOK_URL", global = true)]
    pub webhook_url: Option<String>,
}

impl DiscordArgs {
    /// Best effort: a failed notification never fails the command.
    pub fn notify(&self, message: &str) {
        let Some(url) = &self.webhook_url else {
            debug!("no Discord webhook, skipping the notification");
            return;
        };
        if let Err(error) = Self::notify_fallible(url, message) {
            warn!("failed to send the notification: {error:#}");
        }
    }

    #[instrument(skip_all)]
    fn notify_fallible(url: &str, message: &str) -> Result {
        #[derive(Serialize)]
        struct WebhookMessage<'a> {
            content: &'a str,
            username: &'static str,
        }

        info!(message, "notifying…");
        let agent: Agent =
            Agent::config_builder().timeout_global(Some(Duration::from_secs(10))).build().into();
        agent.post(url).send_json(WebhookMessage { content: message, username: crate_name!() })?;
        Ok(())
    }
}
