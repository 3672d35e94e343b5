//! Inbound webhook payload types for the WhatsApp Cloud API.
//!
//! Only the fields the service reads are modelled; everything else in the
//! payload is ignored. Every field is defaulted so partial payloads (status
//! updates, test pings) still deserialize.

use serde::{Deserialize, Serialize};

/// Change field carrying user messages.
pub const MESSAGES_FIELD: &str = "messages";

/// Top-level webhook notification.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub entry: Vec<WebhookEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookEntry {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub changes: Vec<WebhookChange>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookChange {
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub value: ChangeValue,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChangeValue {
    #[serde(default)]
    pub messaging_product: String,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub messages: Vec<InboundMessage>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub display_phone_number: String,
    #[serde(default)]
    pub phone_number_id: String,
}

/// One message sent by an end user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InboundMessage {
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<InboundText>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InboundText {
    #[serde(default)]
    pub body: String,
}

impl InboundMessage {
    /// The text body, for `type == "text"` messages.
    pub fn text_body(&self) -> Option<&str> {
        if self.kind != "text" {
            return None;
        }
        Some(self.text.as_ref().map_or("", |t| t.body.as_str()))
    }
}

impl WebhookPayload {
    /// All messages from changes whose field is `messages`, in payload order.
    pub fn messages(&self) -> impl Iterator<Item = &InboundMessage> {
        self.entry
            .iter()
            .flat_map(|entry| entry.changes.iter())
            .filter(|change| change.field == MESSAGES_FIELD)
            .flat_map(|change| change.value.messages.iter())
    }
}
