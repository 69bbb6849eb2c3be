// Agent message envelopes
//
// Envelopes are the only thing that crosses a role boundary. The router pairs
// each one with a sender and a recipient address but never looks inside the
// payload.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role an agent plays in a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Human,
    Manager,
    Worker,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Human => write!(f, "human"),
            Role::Manager => write!(f, "manager"),
            Role::Worker => write!(f, "worker"),
        }
    }
}

/// Routing address of an agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentId {
    pub role: Role,
    pub id: Uuid,
}

impl AgentId {
    /// Create a fresh address for an agent playing `role`
    pub fn new(role: Role) -> Self {
        Self {
            role,
            id: Uuid::new_v4(),
        }
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let simple = self.id.simple().to_string();
        write!(f, "{}-{}", self.role, &simple[..8])
    }
}

/// The fixed set of envelope types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageType {
    SendPurpose,
    SendTask,
    SendResult,
    SendSummary,
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageType::SendPurpose => write!(f, "SEND_PURPOSE"),
            MessageType::SendTask => write!(f, "SEND_TASK"),
            MessageType::SendResult => write!(f, "SEND_RESULT"),
            MessageType::SendSummary => write!(f, "SEND_SUMMARY"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePayload {
    pub content: String,
}

/// Envelope: `{ "type": ..., "payload": { "content": ... } }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "type")]
    pub message_type: MessageType,
    pub payload: MessagePayload,
}

impl Message {
    pub fn new(message_type: MessageType, content: impl Into<String>) -> Self {
        Self {
            message_type,
            payload: MessagePayload {
                content: content.into(),
            },
        }
    }

    pub fn content(&self) -> &str {
        &self.payload.content
    }
}

/// An envelope in transit between two agents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentMessage {
    pub from: AgentId,
    pub to: AgentId,
    pub message: Message,
}

impl AgentMessage {
    pub fn new(from: AgentId, to: AgentId, message: Message) -> Self {
        Self { from, to, message }
    }
}
