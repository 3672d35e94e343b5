use thiserror::Error;

use crate::flow::StateId;

/// Errors raised while resolving flows during a conversation step.
///
/// A missing flow is a configuration defect, never a user error: user input
/// always degrades to the welcome reply instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    #[error("flow not found: '{0}'")]
    NotFound(StateId),
}

/// Errors from building or validating a flow table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("duplicate flow state '{0}'")]
    DuplicateState(StateId),

    #[error("flow table is missing required states: {}", join_states(.0))]
    MissingStates(Vec<StateId>),
}

fn join_states(states: &[StateId]) -> String {
    states
        .iter()
        .map(StateId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors from delivering a reply to the messaging provider.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("delivery client not configured: {0}")]
    NotConfigured(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("provider returned status {status}: {body}")]
    Api { status: u16, body: String },
}
