use std::sync::Arc;

use async_trait::async_trait;

use super::errors::{AgentError, AgentResult};
use super::events::{AgentEvent, EventSink, TracingSink};
use super::gateway::CompletionGateway;
use super::messages::{AgentId, AgentMessage, Message, MessageType, Role};
use super::router::Agent;
use super::types::{ConversationContext, ResponseFormat, Turn, TurnRole};

/// Worker Agent that executes one delegated task per invocation
///
/// Each task is answered from a fresh single-turn conversation. Answers are
/// kept in the worker's own history, which is never sent back to the model,
/// so the worker has no memory across tasks.
pub struct WorkerAgent {
    id: AgentId,
    gateway: Arc<dyn CompletionGateway>,
    sink: Arc<dyn EventSink>,
    history: ConversationContext,
}

impl WorkerAgent {
    pub fn new(gateway: Arc<dyn CompletionGateway>) -> Self {
        Self {
            id: AgentId::new(Role::Worker),
            gateway,
            sink: Arc::new(TracingSink),
            history: ConversationContext::new(),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Answers produced so far, oldest first
    pub fn history(&self) -> &ConversationContext {
        &self.history
    }

    /// Execute a task and return the completion text
    pub async fn execute_task(&mut self, task: &str) -> AgentResult<String> {
        let turns = [Turn::new(TurnRole::User, task)];

        let result = self
            .gateway
            .complete(&turns, ResponseFormat::Text)
            .await?
            .into_content("worker task")?;

        self.history.push(TurnRole::Assistant, result.clone());
        self.sink.emit(AgentEvent::TaskCompleted {
            worker: self.id,
            result_len: result.len(),
        });

        Ok(result)
    }
}

#[async_trait]
impl Agent for WorkerAgent {
    fn id(&self) -> AgentId {
        self.id
    }

    async fn receive(
        &mut self,
        message: Message,
        from: AgentId,
    ) -> AgentResult<Option<AgentMessage>> {
        match message.message_type {
            MessageType::SendTask => {
                let result = self.execute_task(message.content()).await?;
                Ok(Some(AgentMessage::new(
                    self.id,
                    from,
                    Message::new(MessageType::SendResult, result),
                )))
            }
            other => Err(AgentError::UnknownMessageType {
                recipient: self.id,
                message_type: other,
            }),
        }
    }
}
