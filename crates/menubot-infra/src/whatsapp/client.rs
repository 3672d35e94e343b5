//! WhatsAppClient -- [`ReplySender`] for the WhatsApp Cloud API.
//!
//! Posts text messages to `{api_base_url}/{phone_number_id}/messages` with
//! bearer authentication. The access token is wrapped in [`SecretString`]
//! and only exposed when building the `Authorization` header.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use menubot_core::delivery::ReplySender;
use menubot_types::config::WhatsAppConfig;
use menubot_types::error::DeliveryError;
use menubot_types::message::OutboundMessage;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// WhatsApp Cloud API reply client.
///
/// When `recipient_override` is configured every reply goes to that number
/// instead of the original sender, which is how the service is exercised
/// from a development number.
#[derive(Debug)]
pub struct WhatsAppClient {
    client: reqwest::Client,
    access_token: SecretString,
    phone_number_id: String,
    recipient_override: Option<String>,
    base_url: String,
}

impl WhatsAppClient {
    /// Build a client from the `[whatsapp]` config section.
    ///
    /// Missing credentials are not rejected here; `send` reports them as
    /// [`DeliveryError::NotConfigured`] so the webhook can still answer.
    pub fn new(config: &WhatsAppConfig) -> Result<Self, DeliveryError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| DeliveryError::Request(format!("failed to create HTTP client: {e}")))?;

        let recipient_override = Some(config.recipient_override.trim())
            .filter(|to| !to.is_empty())
            .map(str::to_string);

        Ok(Self {
            client,
            access_token: SecretString::from(config.access_token.clone()),
            phone_number_id: config.phone_number_id.clone(),
            recipient_override,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Replace the underlying HTTP client (proxies, custom TLS, tests).
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Whether both the access token and phone number id are set.
    pub fn is_configured(&self) -> bool {
        !self.access_token.expose_secret().is_empty() && !self.phone_number_id.is_empty()
    }

    fn messages_url(&self) -> String {
        format!("{}/{}/messages", self.base_url, self.phone_number_id)
    }

    /// The message as it will be posted, after applying the recipient override.
    fn addressed(&self, message: &OutboundMessage) -> OutboundMessage {
        match &self.recipient_override {
            Some(to) => message.addressed_to(to.as_str()),
            None => message.clone(),
        }
    }
}

impl ReplySender for WhatsAppClient {
    fn name(&self) -> &str {
        "whatsapp"
    }

    async fn send(&self, message: &OutboundMessage) -> Result<(), DeliveryError> {
        if !self.is_configured() {
            tracing::warn!("WhatsApp credentials missing, reply not sent");
            return Err(DeliveryError::NotConfigured(
                "access token and phone number id are required".to_string(),
            ));
        }

        let outbound = self.addressed(message);
        if outbound.to.is_empty() {
            return Err(DeliveryError::Request("message has no recipient".to_string()));
        }

        let response = self
            .client
            .post(self.messages_url())
            .bearer_auth(self.access_token.expose_secret())
            .json(&outbound)
            .send()
            .await
            .map_err(|e| DeliveryError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), %body, "WhatsApp API rejected reply");
            return Err(DeliveryError::Api {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(to = %outbound.to, "reply delivered");
        Ok(())
    }
}
