//! Business logic for menubot.
//!
//! This crate holds the parts of the service with real concurrency and
//! lifecycle concerns: the in-memory [`session::SessionStore`] with TTL
//! eviction, the immutable [`flow::FlowRegistry`], and the
//! [`conversation::ConversationEngine`] that drives the menu state machine.
//! It also defines the [`delivery::ReplySender`] port that the
//! infrastructure layer implements. It depends only on `menubot-types` --
//! never on `menubot-infra` or any HTTP crate.

pub mod clock;
pub mod conversation;
pub mod delivery;
pub mod flow;
pub mod session;
