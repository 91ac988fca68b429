use anyhow::{Context, Result};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use crate::config::settings::NotifySettings;

/// JSON client for the push gateway, paced so a burst of subscriptions does
/// not hammer the gateway
#[derive(Clone)]
pub struct GatewayClient {
    client: Client,
    gateway_url: String,
    delay: Duration,
}

impl GatewayClient {
    pub fn new(settings: &NotifySettings) -> Result<Self> {
        let client = Self::build_client(settings.user_agent, settings.timeout_secs)?;

        Ok(Self {
            client,
            gateway_url: settings.gateway_url.to_string(),
            delay: Duration::from_millis(settings.rate_limit_ms),
        })
    }

    /// Posts one payload per endpoint, sleeping between sends.
    pub async fn deliver<T: Serialize>(&self, endpoints: &[String], payload: &T) -> Result<()> {
        for (idx, endpoint) in endpoints.iter().enumerate() {
            if idx > 0 {
                tokio::time::sleep(self.delay).await;
            }
            self.post(endpoint, payload).await?;
        }
        Ok(())
    }

    fn build_client(user_agent: &str, timeout_secs: u64) -> Result<Client> {
        Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to build gateway HTTP client")
    }

    async fn post<T: Serialize>(&self, endpoint: &str, payload: &T) -> Result<()> {
        let body = serde_json::json!({
            "endpoint": endpoint,
            "message": payload,
        });

        self.client
            .post(&self.gateway_url)
            .json(&body)
            .send()
            .await
            .context("Failed to send push request")?
            .error_for_status()
            .context("Push gateway rejected the request")?;

        Ok(())
    }
}
