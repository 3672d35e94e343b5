//! Infrastructure layer for menubot.
//!
//! Implements the ports defined in `menubot-core` and loads everything that
//! comes from outside the process:
//!
//! - `config` -- `menubot.toml` loading plus environment overrides
//! - `flows` -- TOML flow tables
//! - `whatsapp` -- WhatsApp Cloud API reply client and webhook payload types
//! - `signature` -- `X-Hub-Signature-256` verification

pub mod config;
pub mod flows;
pub mod signature;
pub mod whatsapp;
