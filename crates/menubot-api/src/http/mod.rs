//! HTTP layer for menubot.
//!
//! Axum router serving the WhatsApp webhook plus health and stats
//! endpoints, with CORS and request tracing.

pub mod error;
pub mod handlers;
pub mod router;
