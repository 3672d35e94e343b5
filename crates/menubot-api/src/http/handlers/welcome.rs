//! GET /whatsapp/welcome - the greeting as an outbound message.

use axum::Json;
use axum::extract::State;

use menubot_types::message::OutboundMessage;

use crate::state::AppState;

pub async fn get_welcome(State(state): State<AppState>) -> Json<OutboundMessage> {
    Json(OutboundMessage::text("", state.engine.default_greeting()))
}
