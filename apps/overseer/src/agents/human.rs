use async_trait::async_trait;

use super::errors::{AgentError, AgentResult};
use super::messages::{AgentId, AgentMessage, Message, MessageType, Role};
use super::router::Agent;

/// Supplies the goal text
pub trait PurposeReader {
    fn read(&mut self) -> AgentResult<String>;
}

/// Receives the finished report
pub trait ReportWriter: Send {
    fn write(&mut self, report: &str) -> AgentResult<()>;
}

impl ReportWriter for Vec<Box<dyn ReportWriter>> {
    fn write(&mut self, report: &str) -> AgentResult<()> {
        for writer in self.iter_mut() {
            writer.write(report)?;
        }
        Ok(())
    }
}

/// The human end of a session: sends the goal, receives the report
pub struct HumanAgent {
    id: AgentId,
    output: Box<dyn ReportWriter>,
}

impl HumanAgent {
    pub fn new(output: Box<dyn ReportWriter>) -> Self {
        Self {
            id: AgentId::new(Role::Human),
            output,
        }
    }

    /// Build the SEND_PURPOSE envelope for `purpose`
    pub fn send_purpose(&self, purpose: &str, to: AgentId) -> AgentMessage {
        AgentMessage::new(self.id, to, Message::new(MessageType::SendPurpose, purpose))
    }
}

#[async_trait]
impl Agent for HumanAgent {
    fn id(&self) -> AgentId {
        self.id
    }

    async fn receive(
        &mut self,
        message: Message,
        _from: AgentId,
    ) -> AgentResult<Option<AgentMessage>> {
        match message.message_type {
            MessageType::SendSummary => {
                self.output.write(message.content())?;
                Ok(None)
            }
            other => Err(AgentError::UnknownMessageType {
                recipient: self.id,
                message_type: other,
            }),
        }
    }
}
