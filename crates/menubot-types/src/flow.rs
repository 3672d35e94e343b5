//! Flow definitions and conversation state identifiers.
//!
//! A `Flow` is the immutable definition of one conversation state: the text
//! sent to the user when the state is entered, the menu options it offers,
//! and an optional tag naming the free-form data it asks for next.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Identifier of a conversation state (`welcome`, `option_a`, ...).
///
/// Flow tables may be loaded from disk, so any string is accepted here.
/// The engine only assigns the well-known ids exposed as constants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateId(String);

impl StateId {
    /// Entry state for every new or expired user.
    pub const WELCOME: &'static str = "welcome";

    /// State after a menu option was chosen.
    pub const COLLECTING_DATA: &'static str = "collecting_data";

    /// Prefix of the per-option states (`option_a` .. `option_d`).
    pub const OPTION_PREFIX: &'static str = "option_";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn welcome() -> Self {
        Self::new(Self::WELCOME)
    }

    pub fn collecting_data() -> Self {
        Self::new(Self::COLLECTING_DATA)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StateId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for StateId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for StateId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// One of the four menu letters a user can send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MenuChoice {
    A,
    B,
    C,
    D,
}

impl MenuChoice {
    /// All menu choices in display order.
    pub const ALL: [MenuChoice; 4] = [MenuChoice::A, MenuChoice::B, MenuChoice::C, MenuChoice::D];

    /// Parse an already-normalized (trimmed, uppercased) message.
    ///
    /// Only the exact strings `"A"`, `"B"`, `"C"` and `"D"` are accepted.
    pub fn parse(normalized: &str) -> Option<Self> {
        match normalized {
            "A" => Some(MenuChoice::A),
            "B" => Some(MenuChoice::B),
            "C" => Some(MenuChoice::C),
            "D" => Some(MenuChoice::D),
            _ => None,
        }
    }

    /// The uppercase letter as sent by the user.
    pub fn code(&self) -> &'static str {
        match self {
            MenuChoice::A => "A",
            MenuChoice::B => "B",
            MenuChoice::C => "C",
            MenuChoice::D => "D",
        }
    }

    /// The flow state holding this option's reply (`option_a` ...).
    pub fn state_id(&self) -> StateId {
        StateId::new(format!(
            "{}{}",
            StateId::OPTION_PREFIX,
            self.code().to_lowercase()
        ))
    }

    /// Inverse of [`MenuChoice::state_id`].
    pub fn from_state(state: &StateId) -> Option<Self> {
        let letter = state.as_str().strip_prefix(StateId::OPTION_PREFIX)?;
        Self::parse(&letter.to_uppercase())
    }
}

impl fmt::Display for MenuChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for MenuChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid menu choice: '{s}'"))
    }
}

/// A selectable menu entry within a flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowOption {
    pub code: String,
    pub label: String,
    pub description: String,
    pub next_state: StateId,
}

/// Immutable definition of one conversation state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flow {
    pub state: StateId,
    /// Text returned verbatim to the user.
    pub message: String,
    /// Menu entries; empty for leaf flows.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FlowOption>,
    /// Tag naming the free-form data this flow asks for next.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_request: Option<String>,
}

impl Flow {
    /// Create a leaf flow with no options and no data request.
    pub fn new(state: impl Into<StateId>, message: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            message: message.into(),
            options: Vec::new(),
            data_request: None,
        }
    }

    pub fn with_options(mut self, options: Vec<FlowOption>) -> Self {
        self.options = options;
        self
    }

    pub fn with_data_request(mut self, tag: impl Into<String>) -> Self {
        self.data_request = Some(tag.into());
        self
    }
}
