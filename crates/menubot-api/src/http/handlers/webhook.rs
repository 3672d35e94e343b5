//! WhatsApp webhook endpoints.
//!
//! - `GET /whatsapp/webhook` -- Meta's subscription handshake
//! - `POST /whatsapp/webhook` -- inbound message notifications
//!
//! Each text message is run through the conversation engine and the reply
//! is delivered through the configured sender. Failures are reported per
//! message in the response body; the webhook itself still answers 200 so
//! Meta does not redeliver the batch.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};
use tracing::Instrument;

use menubot_infra::signature::{SIGNATURE_HEADER, verify_signature};
use menubot_infra::whatsapp::{InboundMessage, WebhookPayload};
use menubot_types::message::OutboundMessage;

use crate::http::error::AppError;
use crate::state::AppState;

/// Query parameters of the verification handshake.
#[derive(Debug, Default, Deserialize)]
pub struct VerifyParams {
    #[serde(rename = "hub.mode", default)]
    pub mode: String,
    #[serde(rename = "hub.verify_token", default)]
    pub verify_token: String,
    #[serde(rename = "hub.challenge", default)]
    pub challenge: String,
}

/// GET /whatsapp/webhook
///
/// Echoes `hub.challenge` when `hub.mode` is `subscribe` and the token
/// matches the configured verify token. An unconfigured verify token never
/// matches.
pub async fn verify_webhook(
    State(state): State<AppState>,
    Query(params): Query<VerifyParams>,
) -> Result<String, AppError> {
    let expected = state.config.whatsapp.verify_token.as_str();

    if params.mode != "subscribe" || expected.is_empty() || params.verify_token != expected {
        tracing::warn!(mode = %params.mode, "webhook verification failed");
        return Err(AppError::Forbidden);
    }

    tracing::info!("webhook verification succeeded");
    Ok(params.challenge)
}

/// Summary returned for every accepted notification.
#[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct WebhookResponse {
    pub status: String,
    pub messages_received: usize,
    pub messages_processed: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub chatbot_responses: Vec<String>,
}

/// POST /whatsapp/webhook
pub async fn handle_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookResponse>, AppError> {
    let app_secret = state.config.whatsapp.app_secret.as_str();
    if !app_secret.is_empty() {
        let header = headers
            .get(SIGNATURE_HEADER)
            .and_then(|value| value.to_str().ok());
        if let Err(e) = verify_signature(app_secret.as_bytes(), &body, header) {
            tracing::warn!(error = %e, "rejected webhook with bad signature");
            return Err(e.into());
        }
    }

    let payload: WebhookPayload = serde_json::from_slice(&body).map_err(|e| {
        tracing::error!(error = %e, "failed to parse webhook payload");
        AppError::BadRequest("Invalid JSON".to_string())
    })?;

    let span = tracing::info_span!(
        "webhook",
        request_id = %uuid::Uuid::now_v7(),
        object = %payload.object,
        entries = payload.entry.len(),
    );

    let mut summary = WebhookResponse::default();
    async {
        for message in payload.messages() {
            summary.messages_received += 1;
            handle_message(&state, message, &mut summary).await;
        }
    }
    .instrument(span)
    .await;

    summary.status = if summary.errors.is_empty() {
        "success".to_string()
    } else {
        tracing::warn!(errors = ?summary.errors, "some messages failed to process");
        "partial_success".to_string()
    };

    Ok(Json(summary))
}

async fn handle_message(state: &AppState, message: &InboundMessage, summary: &mut WebhookResponse) {
    tracing::info!(from = %message.from, message_id = %message.id, kind = %message.kind, "processing message");

    let Some(text) = message.text_body() else {
        tracing::warn!(kind = %message.kind, "ignoring non-text message");
        summary
            .errors
            .push(format!("Message {}: unsupported type {}", message.id, message.kind));
        return;
    };

    let reply = match state.engine.process(&message.from, text) {
        Ok(reply) => reply,
        Err(e) => {
            summary
                .errors
                .push(format!("Message {}: failed to process - {e}", message.id));
            return;
        }
    };
    state.metrics.record_processed();

    if !reply.is_empty() {
        summary.chatbot_responses.push(reply.clone());
    }

    let outbound = OutboundMessage::text(message.from.as_str(), reply);
    if let Err(e) = state.sender.send(&outbound).await {
        tracing::error!(error = %e, sender = state.sender.name(), "failed to send reply");
        summary
            .errors
            .push(format!("Message {}: failed to send response - {e}", message.id));
        return;
    }

    summary.messages_processed += 1;
    tracing::info!(message_id = %message.id, from = %message.from, "message processed");
}
