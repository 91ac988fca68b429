pub mod client;

use anyhow::Result;
use log::{info, warn};
use serde::Serialize;
use urlencoding::encode;

use crate::config::settings::NotifySettings;
use crate::domain::PlayerProfile;

pub use client::GatewayClient;

/// What the gateway forwards to a subscribed device
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PushMessage {
    pub profile_id: i64,
    pub title: String,
    pub body: String,
    pub link: String,
}

/// Best-effort push dispatch. Delivery failures are logged and swallowed;
/// a lost notification must never fail the request that triggered it.
#[derive(Clone)]
pub struct Notifier {
    client: GatewayClient,
    profile_base_url: String,
}

impl Notifier {
    pub fn new(settings: &NotifySettings) -> Result<Self> {
        Ok(Self {
            client: GatewayClient::new(settings)?,
            profile_base_url: settings.profile_base_url.to_string(),
        })
    }

    pub async fn challenge_created(
        &self,
        opponent: &PlayerProfile,
        challenger: &PlayerProfile,
        endpoints: &[String],
    ) {
        let message = PushMessage {
            profile_id: opponent.id,
            title: "New challenge".to_string(),
            body: format!("{} has challenged you", challenger.display_name),
            link: self.profile_link(challenger),
        };
        self.dispatch("challenge", opponent.id, endpoints, &message)
            .await;
    }

    pub async fn match_settled(
        &self,
        recipient: &PlayerProfile,
        opponent: &PlayerProfile,
        won: bool,
        endpoints: &[String],
    ) {
        let outcome = if won { "won against" } else { "lost to" };
        let message = PushMessage {
            profile_id: recipient.id,
            title: "Match result recorded".to_string(),
            body: format!("You {} {}", outcome, opponent.display_name),
            link: self.profile_link(recipient),
        };
        self.dispatch("result", recipient.id, endpoints, &message)
            .await;
    }

    fn profile_link(&self, profile: &PlayerProfile) -> String {
        let encoded_name = encode(&profile.display_name).replace(' ', "+");
        format!("{}/{}/{}", self.profile_base_url, encoded_name, profile.id)
    }

    async fn dispatch(
        &self,
        event: &str,
        profile_id: i64,
        endpoints: &[String],
        message: &PushMessage,
    ) {
        if endpoints.is_empty() {
            return;
        }

        match self.client.deliver(endpoints, message).await {
            Ok(()) => info!(
                "Delivered {} notification to {} endpoint(s) for profile {}",
                event,
                endpoints.len(),
                profile_id
            ),
            Err(e) => warn!(
                "{}: {:?}",
                crate::errors::notify_context(event, profile_id),
                e
            ),
        }
    }
}
