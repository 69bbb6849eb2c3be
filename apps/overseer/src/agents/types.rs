use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::errors::{AgentError, AgentResult};

/// Speaker of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    System,
    User,
    Assistant,
}

impl std::fmt::Display for TurnRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TurnRole::System => write!(f, "system"),
            TurnRole::User => write!(f, "user"),
            TurnRole::Assistant => write!(f, "assistant"),
        }
    }
}

/// One role-tagged unit of text in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: TurnRole,
    pub text: String,
}

impl Turn {
    pub fn new(role: TurnRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }
}

/// Append-only turn history owned by a single agent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationContext {
    turns: Vec<Turn>,
}

impl ConversationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, role: TurnRole, text: impl Into<String>) {
        self.turns.push(Turn::new(role, text));
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }
}

/// Policy bounding which turns are sent to the gateway on each call
///
/// The stored context is never truncated; the window only shapes the request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContextWindow {
    /// Send the whole history
    #[default]
    Unbounded,
    /// Send every system turn plus the most recent `n` other turns
    Recent(usize),
}

impl ContextWindow {
    pub fn apply(&self, turns: &[Turn]) -> Vec<Turn> {
        match *self {
            ContextWindow::Unbounded => turns.to_vec(),
            ContextWindow::Recent(n) => {
                let conversational = turns
                    .iter()
                    .filter(|t| t.role != TurnRole::System)
                    .count();
                let mut skip = conversational.saturating_sub(n);

                turns
                    .iter()
                    .filter(|t| {
                        if t.role == TurnRole::System {
                            return true;
                        }
                        if skip > 0 {
                            skip -= 1;
                            return false;
                        }
                        true
                    })
                    .cloned()
                    .collect()
            }
        }
    }
}

/// Addressee named by a delegation decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Recipient {
    Human,
    Ai,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionMetadata {
    #[serde(rename = "continue", alias = "continue_")]
    pub should_continue: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionPayload {
    pub to: Recipient,
    pub message: String,
    #[serde(default, deserialize_with = "lenient_tasks")]
    pub tasks: Vec<String>,
    #[serde(default, deserialize_with = "lenient_next_task")]
    pub next_task: Option<String>,
}

// `tasks` and `next_task` are informational. Whatever shape the model
// produces is accepted; non-string values are kept as compact JSON.
fn loggable(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}

fn lenient_tasks<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.into_iter().filter_map(loggable).collect(),
        other => loggable(other).into_iter().collect(),
    })
}

fn lenient_next_task<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(loggable(Value::deserialize(deserializer)?))
}

/// Structured answer the manager requests from the model after each turn
///
/// Only `continue` and `to` drive control flow; `tasks` and `next_task` are
/// carried for logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegationDecision {
    pub metadata: DecisionMetadata,
    pub payload: DecisionPayload,
}

impl DelegationDecision {
    /// Parse and validate a structured completion
    pub fn parse(text: &str) -> AgentResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn should_continue(&self) -> bool {
        self.metadata.should_continue
    }

    pub fn message(&self) -> &str {
        &self.payload.message
    }

    /// True when the decision asks for another round with a worker
    pub fn delegates_to_worker(&self) -> bool {
        self.metadata.should_continue && self.payload.to == Recipient::Ai
    }
}

/// Shape of completion requested from the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    /// Free text
    Text,
    /// A JSON object the caller will validate
    Json,
}

/// Raw gateway output; the text may be absent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completion {
    pub text: Option<String>,
}

impl Completion {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }

    pub fn empty() -> Self {
        Self { text: None }
    }

    /// Returns the text, or `EmptyResponse` when there is none
    pub fn into_content(self, step: &str) -> AgentResult<String> {
        match self.text {
            Some(text) if !text.is_empty() => Ok(text),
            _ => Err(AgentError::EmptyResponse(step.to_string())),
        }
    }
}
