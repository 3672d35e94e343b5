//! Outbound message shape shared by the webhook layer and delivery clients.

use serde::{Deserialize, Serialize};

/// Body of a text message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBody {
    pub body: String,
}

/// A text reply addressed to one user, in WhatsApp Cloud API shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub messaging_product: String,
    /// Recipient; empty for greetings produced outside a conversation.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub to: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub text: TextBody,
}

impl OutboundMessage {
    /// Create a WhatsApp text message for `to`.
    pub fn text(to: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            messaging_product: "whatsapp".to_string(),
            to: to.into(),
            kind: "text".to_string(),
            text: TextBody { body: body.into() },
        }
    }

    /// Return a copy addressed to `to`.
    pub fn addressed_to(&self, to: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            ..self.clone()
        }
    }
}
