//! Immutable registry of flows keyed by state id.
//!
//! Built once at startup and shared behind an `Arc`; there is no mutation
//! API. Changing the copy of a prompt means building a new registry.

use std::collections::HashMap;

use menubot_types::error::{FlowError, RegistryError};
use menubot_types::flow::{Flow, MenuChoice, StateId};

/// Read-only mapping from conversation state to its [`Flow`].
///
/// Safe for unsynchronized concurrent reads.
#[derive(Debug, Clone)]
pub struct FlowRegistry {
    flows: HashMap<StateId, Flow>,
}

impl FlowRegistry {
    /// Build a registry from a flow list.
    ///
    /// Fails if two flows share a state id. Missing well-known states are
    /// not rejected here; see [`FlowRegistry::validate`].
    pub fn new(flows: Vec<Flow>) -> Result<Self, RegistryError> {
        let mut map = HashMap::with_capacity(flows.len());
        for flow in flows {
            let state = flow.state.clone();
            if map.insert(state.clone(), flow).is_some() {
                return Err(RegistryError::DuplicateState(state));
            }
        }
        Ok(Self { flows: map })
    }

    /// Registry holding the built-in menu.
    pub fn builtin() -> Self {
        let flows = super::defaults::default_flows()
            .into_iter()
            .map(|flow| (flow.state.clone(), flow))
            .collect();
        Self { flows }
    }

    /// Look up the flow for `state`.
    pub fn lookup(&self, state: &StateId) -> Result<&Flow, FlowError> {
        self.flows
            .get(state)
            .ok_or_else(|| FlowError::NotFound(state.clone()))
    }

    /// All registered flows.
    pub fn all(&self) -> &HashMap<StateId, Flow> {
        &self.flows
    }

    /// Flows sorted by state id, for display.
    pub fn sorted(&self) -> Vec<&Flow> {
        let mut flows: Vec<&Flow> = self.flows.values().collect();
        flows.sort_by(|a, b| a.state.cmp(&b.state));
        flows
    }

    pub fn len(&self) -> usize {
        self.flows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }

    /// States the conversation engine transitions to unconditionally.
    pub fn required_states() -> Vec<StateId> {
        let mut states = vec![StateId::welcome(), StateId::collecting_data()];
        states.extend(MenuChoice::ALL.iter().map(MenuChoice::state_id));
        states
    }

    /// Check that every state the engine may look up is registered.
    ///
    /// A registry failing validation still works; the engine reports
    /// `FlowError::NotFound` on the calls that hit a gap.
    pub fn validate(&self) -> Result<(), RegistryError> {
        let missing: Vec<StateId> = Self::required_states()
            .into_iter()
            .filter(|state| !self.flows.contains_key(state))
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(RegistryError::MissingStates(missing))
        }
    }
}

impl Default for FlowRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
