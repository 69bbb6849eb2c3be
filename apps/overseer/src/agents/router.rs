// Message router
//
// Delivery is sequential: a handler returns the envelope it wants sent and
// the router queues it, so one scheduler loop drains the whole conversation
// without nesting calls.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;

use super::errors::{AgentError, AgentResult};
use super::events::{AgentEvent, EventSink};
use super::messages::{AgentId, AgentMessage, Message};

/// Anything that can be addressed by the router
#[async_trait]
pub trait Agent: Send {
    fn id(&self) -> AgentId;

    /// Handle one envelope; the returned envelope, if any, is sent next
    async fn receive(
        &mut self,
        message: Message,
        from: AgentId,
    ) -> AgentResult<Option<AgentMessage>>;
}

pub struct MessageRouter {
    agents: HashMap<AgentId, Box<dyn Agent>>,
    pending: VecDeque<AgentMessage>,
    sink: Arc<dyn EventSink>,
    delivered: usize,
}

impl MessageRouter {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self {
            agents: HashMap::new(),
            pending: VecDeque::new(),
            sink,
            delivered: 0,
        }
    }

    /// Make an agent addressable; returns its address
    pub fn register(&mut self, agent: Box<dyn Agent>) -> AgentId {
        let id = agent.id();
        self.agents.insert(id, agent);
        id
    }

    pub fn contains(&self, id: &AgentId) -> bool {
        self.agents.contains_key(id)
    }

    /// Record the envelope and queue it for delivery
    pub fn send(&mut self, envelope: AgentMessage) {
        self.sink.emit(AgentEvent::MessageSent {
            from: envelope.from,
            to: envelope.to,
            message_type: envelope.message.message_type,
            content: envelope.message.payload.content.clone(),
        });
        self.pending.push_back(envelope);
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Envelopes delivered since the router was created
    pub fn delivered(&self) -> usize {
        self.delivered
    }

    /// Deliver the oldest pending envelope; `false` when nothing was pending
    pub async fn step(&mut self) -> AgentResult<bool> {
        let Some(envelope) = self.pending.pop_front() else {
            return Ok(false);
        };

        let recipient = self
            .agents
            .get_mut(&envelope.to)
            .ok_or_else(|| AgentError::AgentNotFound(envelope.to.to_string()))?;

        let reply = recipient.receive(envelope.message, envelope.from).await?;
        self.delivered += 1;

        if let Some(reply) = reply {
            self.send(reply);
        }
        Ok(true)
    }

    /// Drain the queue; returns how many envelopes were delivered
    pub async fn run(&mut self) -> AgentResult<usize> {
        let start = self.delivered;
        while self.step().await? {}
        Ok(self.delivered - start)
    }
}
