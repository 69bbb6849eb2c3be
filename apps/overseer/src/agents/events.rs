// Agent observability events
//
// Agents and the router report what they do through an injected EventSink
// instead of logging directly.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use super::messages::{AgentId, MessageType};
use super::state::ManagerPhase;
use super::types::Recipient;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentEvent {
    /// An envelope was handed to the router
    MessageSent {
        from: AgentId,
        to: AgentId,
        message_type: MessageType,
        content: String,
    },
    /// The manager moved between phases
    PhaseChanged {
        agent: AgentId,
        from: ManagerPhase,
        to: ManagerPhase,
    },
    /// The manager parsed a delegation decision
    DecisionReceived {
        agent: AgentId,
        should_continue: bool,
        to: Recipient,
        tasks: Vec<String>,
        next_task: Option<String>,
    },
    /// The manager overrode a continue decision because of its round cap
    RoundLimitReached { agent: AgentId, rounds: u32 },
    /// A worker finished a task
    TaskCompleted { worker: AgentId, result_len: usize },
}

impl AgentEvent {
    /// The agent that produced this event
    pub fn source(&self) -> AgentId {
        match self {
            AgentEvent::MessageSent { from, .. } => *from,
            AgentEvent::PhaseChanged { agent, .. } => *agent,
            AgentEvent::DecisionReceived { agent, .. } => *agent,
            AgentEvent::RoundLimitReached { agent, .. } => *agent,
            AgentEvent::TaskCompleted { worker, .. } => *worker,
        }
    }
}

/// Destination for agent events
pub trait EventSink: Send + Sync {
    fn emit(&self, event: AgentEvent);
}

/// Renders events as `tracing` records
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: AgentEvent) {
        match event {
            AgentEvent::MessageSent {
                from,
                to,
                message_type,
                content,
            } => {
                tracing::info!(
                    %from,
                    %to,
                    %message_type,
                    "message sent\n{}",
                    content
                );
            }
            AgentEvent::PhaseChanged { agent, from, to } => {
                tracing::debug!(%agent, %from, %to, "manager phase changed");
            }
            AgentEvent::DecisionReceived {
                agent,
                should_continue,
                to,
                tasks,
                next_task,
            } => {
                tracing::info!(
                    %agent,
                    should_continue,
                    ?to,
                    ?tasks,
                    ?next_task,
                    "delegation decision received"
                );
            }
            AgentEvent::RoundLimitReached { agent, rounds } => {
                tracing::warn!(%agent, rounds, "round limit reached, summarizing");
            }
            AgentEvent::TaskCompleted { worker, result_len } => {
                tracing::debug!(%worker, result_len, "task completed");
            }
        }
    }
}

/// Keeps every event in memory
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<AgentEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events emitted so far
    pub fn events(&self) -> Vec<AgentEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Envelopes sent so far, in order, as `(type, from, to, content)`
    pub fn messages(&self) -> Vec<(MessageType, AgentId, AgentId, String)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                AgentEvent::MessageSent {
                    from,
                    to,
                    message_type,
                    content,
                } => Some((message_type, from, to, content)),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, message_type: MessageType) -> usize {
        self.messages()
            .iter()
            .filter(|(t, ..)| *t == message_type)
            .count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: AgentEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
