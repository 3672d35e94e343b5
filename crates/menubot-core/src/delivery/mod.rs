//! Outbound reply delivery.
//!
//! - `sender` -- the [`ReplySender`] trait that delivery clients implement
//! - `box_sender` -- [`BoxReplySender`], a type-erased wrapper for runtime selection
//!
//! Implementations live in menubot-infra (e.g. `WhatsAppClient`).

pub mod box_sender;
pub mod sender;

pub use box_sender::{BoxReplySender, ReplySenderDyn};
pub use sender::ReplySender;
