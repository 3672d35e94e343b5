//! Shared domain types for menubot.
//!
//! This crate contains the domain types used across the menubot workspace:
//! Flow definitions, per-user Sessions, outbound messages, configuration,
//! and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod config;
pub mod error;
pub mod flow;
pub mod message;
pub mod session;
