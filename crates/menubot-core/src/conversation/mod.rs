//! The menu state machine.
//!
//! [`ConversationEngine`] turns one inbound text into one reply, moving the
//! sender's session between `welcome`, the option states and
//! `collecting_data`.

pub mod engine;

pub use engine::{ConversationEngine, normalize};
