//! WhatsApp Cloud API integration.
//!
//! - `client` -- [`WhatsAppClient`], the [`ReplySender`](menubot_core::delivery::ReplySender) for the Graph API
//! - `types` -- inbound webhook payload shapes

pub mod client;
pub mod types;

pub use client::WhatsAppClient;
pub use types::{InboundMessage, WebhookPayload};
