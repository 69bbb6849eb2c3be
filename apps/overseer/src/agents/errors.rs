use thiserror::Error;

use super::messages::{AgentId, MessageType};
use super::state::ManagerPhase;

/// Errors that can occur in the agent system
///
/// Every variant is fatal for the session: nothing in the core catches or
/// retries them.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Completion service returned no content ({0})")]
    EmptyResponse(String),

    #[error("Malformed delegation decision: {0}")]
    MalformedDecision(String),

    #[error("Unknown message type {message_type} for {recipient}")]
    UnknownMessageType {
        recipient: AgentId,
        message_type: MessageType,
    },

    #[error("No recipient recorded: {0}")]
    NoRecipient(String),

    #[error("Completion service error: {0}")]
    Service(String),

    #[error("Agent not found: {0}")]
    AgentNotFound(String),

    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: ManagerPhase, to: ManagerPhase },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for AgentError {
    fn from(err: serde_json::Error) -> Self {
        AgentError::MalformedDecision(err.to_string())
    }
}

pub type AgentResult<T> = Result<T, AgentError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::messages::Role;

    #[test]
    fn json_errors_become_malformed_decisions() {
        let err: AgentError = serde_json::from_str::<serde_json::Value>("{not json")
            .unwrap_err()
            .into();

        assert!(matches!(err, AgentError::MalformedDecision(_)));
    }

    #[test]
    fn unknown_message_type_names_the_recipient() {
        let recipient = AgentId::new(Role::Human);
        let err = AgentError::UnknownMessageType {
            recipient,
            message_type: MessageType::SendTask,
        };

        let text = err.to_string();
        assert!(text.contains("SEND_TASK"));
        assert!(text.contains("human-"));
    }
}
