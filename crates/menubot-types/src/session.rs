//! Per-user conversation session.
//!
//! A `Session` records where one end user currently sits in the menu.
//! Sessions are keyed by the messaging provider's user identifier (the
//! sender phone number for WhatsApp) and live only in memory.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::flow::{MenuChoice, StateId};

/// Mutable per-user conversation record.
///
/// `updated_at` is the sole eviction clock: a session idle for longer than
/// the store's TTL is treated as absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub state: StateId,
    /// Last validly chosen menu option.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_option: Option<MenuChoice>,
    /// Data tag -> last value submitted under that tag.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub collected_data: BTreeMap<String, String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// A fresh session in the `welcome` state with both timestamps at `now`.
    pub fn new(user_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.into(),
            state: StateId::welcome(),
            selected_option: None,
            collected_data: BTreeMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the session has been idle for strictly longer than `ttl`.
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.updated_at > ttl
    }

    /// Record a touch at `now`.
    ///
    /// Never moves `updated_at` before `created_at`.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.created_at);
    }
}
