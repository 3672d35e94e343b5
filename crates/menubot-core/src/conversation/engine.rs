//! ConversationEngine -- per-message menu transitions.
//!
//! | state           | input     | next            | reply            |
//! |-----------------|-----------|-----------------|------------------|
//! | welcome / other | A..D      | collecting_data | Flow[option_x]   |
//! | welcome / other | anything  | welcome         | Flow[welcome]    |
//! | collecting_data | A..D      | collecting_data | Flow[option_x]   |
//! | collecting_data | anything  | welcome         | Flow[welcome]    |
//! | option_x        | anything  | collecting_data | data prompt + recap |
//!
//! Nothing in the current table transitions *into* an `option_x` state, so
//! the last row only fires for sessions seeded by other means.

use std::fmt::Write as _;
use std::sync::Arc;

use tracing::Span;

use menubot_types::error::FlowError;
use menubot_types::flow::{MenuChoice, StateId};
use menubot_types::session::Session;

use crate::flow::FlowRegistry;
use crate::flow::defaults::FALLBACK_GREETING;
use crate::session::SessionStore;

/// Tag used when an option flow does not name the data it requests.
const FALLBACK_DATA_TAG: &str = "data";

/// Trim surrounding whitespace and uppercase.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Drives one user's session through the flow table.
///
/// Cheap to share: holds only `Arc`s and a span.
#[derive(Debug, Clone)]
pub struct ConversationEngine {
    flows: Arc<FlowRegistry>,
    sessions: Arc<SessionStore>,
    span: Span,
}

impl ConversationEngine {
    pub fn new(flows: Arc<FlowRegistry>, sessions: Arc<SessionStore>) -> Self {
        Self {
            flows,
            sessions,
            span: tracing::info_span!("conversation"),
        }
    }

    /// Parent span for every event the engine emits.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn flows(&self) -> &FlowRegistry {
        &self.flows
    }

    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    /// Process one inbound message and return the reply text.
    ///
    /// The whole read-modify-write runs through [`SessionStore::update`], so
    /// concurrent messages from the same user are applied one after the
    /// other. Any input is accepted; unrecognized text falls back to the
    /// welcome menu.
    ///
    /// # Errors
    ///
    /// [`FlowError::NotFound`] when the flow table lacks a state the
    /// transition needs. The stored session is left as it was.
    pub fn process(&self, user_id: &str, raw: &str) -> Result<String, FlowError> {
        let input = normalize(raw);

        let result = self.sessions.update(user_id, |mut session, now| {
            let from = session.state.clone();
            let reply = self.step(&mut session, &input)?;
            session.touch(now);

            tracing::debug!(
                parent: &self.span,
                user_id,
                from = %from,
                to = %session.state,
                "conversation step"
            );
            Ok((session, reply))
        });

        if let Err(ref e) = result {
            tracing::error!(parent: &self.span, user_id, error = %e, "conversation step failed");
        }
        result
    }

    /// The greeting shown outside a conversation.
    ///
    /// The `welcome` flow message, or a fixed fallback when the table has no
    /// `welcome` flow. Never touches the session store.
    pub fn default_greeting(&self) -> String {
        self.flows
            .lookup(&StateId::welcome())
            .map(|flow| flow.message.clone())
            .unwrap_or_else(|_| FALLBACK_GREETING.to_string())
    }

    fn step(&self, session: &mut Session, input: &str) -> Result<String, FlowError> {
        match (MenuChoice::from_state(&session.state), MenuChoice::parse(input)) {
            (Some(option), _) => self.record_data(session, option, input),
            (None, Some(choice)) => self.select(session, choice),
            (None, None) => self.restart(session),
        }
    }

    fn select(&self, session: &mut Session, choice: MenuChoice) -> Result<String, FlowError> {
        let reply = self.flows.lookup(&choice.state_id())?.message.clone();
        session.selected_option = Some(choice);
        session.state = StateId::collecting_data();
        Ok(reply)
    }

    fn restart(&self, session: &mut Session) -> Result<String, FlowError> {
        let reply = self.flows.lookup(&StateId::welcome())?.message.clone();
        session.state = StateId::welcome();
        Ok(reply)
    }

    fn record_data(
        &self,
        session: &mut Session,
        option: MenuChoice,
        input: &str,
    ) -> Result<String, FlowError> {
        let prompt = self.flows.lookup(&StateId::collecting_data())?.message.clone();
        let tag = self
            .flows
            .lookup(&option.state_id())
            .ok()
            .and_then(|flow| flow.data_request.clone())
            .unwrap_or_else(|| FALLBACK_DATA_TAG.to_string());

        session.collected_data.insert(tag, input.to_string());
        session.state = StateId::collecting_data();
        Ok(with_recap(prompt, session))
    }
}

fn with_recap(mut message: String, session: &Session) -> String {
    if session.collected_data.is_empty() {
        return message;
    }
    message.push_str("\n\n📋 Datos recopilados:\n");
    for (tag, value) in &session.collected_data {
        let _ = writeln!(message, "• {tag}: {value}");
    }
    message
}
