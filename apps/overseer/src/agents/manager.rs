use std::sync::Arc;

use async_trait::async_trait;

use super::errors::{AgentError, AgentResult};
use super::events::{AgentEvent, EventSink, TracingSink};
use super::gateway::CompletionGateway;
use super::messages::{AgentId, AgentMessage, Message, MessageType, Role};
use super::prompts::library;
use super::report::compose_report;
use super::router::Agent;
use super::selection::{FirstWorker, WorkerSelector};
use super::state::ManagerPhase;
use super::types::{
    ContextWindow, ConversationContext, DelegationDecision, ResponseFormat, TurnRole,
};

/// Manager Agent responsible for decomposing the goal, delegating tasks,
/// evaluating results and writing the final report
///
/// One manager is one session: it remembers the human who sent the goal and
/// owns the whole conversation it has with the model.
pub struct ManagerAgent {
    id: AgentId,
    gateway: Arc<dyn CompletionGateway>,
    workers: Vec<AgentId>,
    selector: Box<dyn WorkerSelector>,
    sink: Arc<dyn EventSink>,
    window: ContextWindow,
    max_rounds: Option<u32>,
    phase: ManagerPhase,
    context: ConversationContext,
    decisions: Vec<DelegationDecision>,
    human: Option<AgentId>,
    goal: Option<String>,
    rounds: u32,
}

impl ManagerAgent {
    /// Create a manager that delegates to `workers`
    pub fn new(gateway: Arc<dyn CompletionGateway>, workers: Vec<AgentId>) -> Self {
        Self {
            id: AgentId::new(Role::Manager),
            gateway,
            workers,
            selector: Box::new(FirstWorker),
            sink: Arc::new(TracingSink),
            window: ContextWindow::Unbounded,
            max_rounds: None,
            phase: ManagerPhase::AwaitingPurpose,
            context: ConversationContext::new(),
            decisions: Vec::new(),
            human: None,
            goal: None,
            rounds: 0,
        }
    }

    pub fn with_selector(mut self, selector: Box<dyn WorkerSelector>) -> Self {
        self.selector = selector;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_window(mut self, window: ContextWindow) -> Self {
        self.window = window;
        self
    }

    /// Stop delegating after `max_rounds` tasks, even if the model wants more
    pub fn with_max_rounds(mut self, max_rounds: Option<u32>) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    // ===== Getters =====

    pub fn phase(&self) -> ManagerPhase {
        self.phase
    }

    pub fn context(&self) -> &ConversationContext {
        &self.context
    }

    pub fn decisions(&self) -> &[DelegationDecision] {
        &self.decisions
    }

    pub fn goal(&self) -> Option<&str> {
        self.goal.as_deref()
    }

    pub fn human(&self) -> Option<AgentId> {
        self.human
    }

    /// Tasks delegated so far
    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    // ===== Transitions =====

    fn transition(&mut self, next: ManagerPhase) -> AgentResult<()> {
        if !self.phase.can_transition_to(next) {
            return Err(AgentError::InvalidStateTransition {
                from: self.phase,
                to: next,
            });
        }

        self.sink.emit(AgentEvent::PhaseChanged {
            agent: self.id,
            from: self.phase,
            to: next,
        });
        self.phase = next;
        Ok(())
    }

    async fn receive_purpose(&mut self, purpose: &str, from: AgentId) -> AgentResult<AgentMessage> {
        if self.phase != ManagerPhase::AwaitingPurpose {
            return Err(AgentError::InvalidStateTransition {
                from: self.phase,
                to: ManagerPhase::Delegating,
            });
        }

        self.human = Some(from);
        self.goal = Some(purpose.to_string());

        let template = library::delegation();
        self.context.push(TurnRole::System, template.system.clone());
        self.context.push(TurnRole::User, template.render_one("goal", purpose));

        self.transition(ManagerPhase::Delegating)?;

        // The first decision always produces a task, whatever it says about
        // continuing.
        let decision = self.decide().await?;
        self.delegate(decision.message())
    }

    async fn receive_result(&mut self, result: &str) -> AgentResult<AgentMessage> {
        let human = self.human.ok_or_else(|| {
            AgentError::NoRecipient("result arrived before any purpose".to_string())
        })?;

        if self.phase != ManagerPhase::AwaitingResult {
            return Err(AgentError::InvalidStateTransition {
                from: self.phase,
                to: ManagerPhase::Delegating,
            });
        }

        self.context.push(
            TurnRole::User,
            library::worker_result().render_one("result", result),
        );

        let decision = self.decide().await?;
        if !decision.delegates_to_worker() {
            return self.summarize(human).await;
        }

        match self.max_rounds {
            Some(max) if self.rounds >= max => {
                self.sink.emit(AgentEvent::RoundLimitReached {
                    agent: self.id,
                    rounds: self.rounds,
                });
                self.summarize(human).await
            }
            _ => {
                self.transition(ManagerPhase::Delegating)?;
                self.delegate(decision.message())
            }
        }
    }

    /// Ask the model for the next delegation decision
    async fn decide(&mut self) -> AgentResult<DelegationDecision> {
        let turns = self.window.apply(self.context.turns());
        let text = self
            .gateway
            .complete(&turns, ResponseFormat::Json)
            .await?
            .into_content("manager decision")?;

        let decision = DelegationDecision::parse(&text)?;
        self.context.push(TurnRole::Assistant, text);

        self.sink.emit(AgentEvent::DecisionReceived {
            agent: self.id,
            should_continue: decision.should_continue(),
            to: decision.payload.to,
            tasks: decision.payload.tasks.clone(),
            next_task: decision.payload.next_task.clone(),
        });
        self.decisions.push(decision.clone());

        Ok(decision)
    }

    fn delegate(&mut self, task: &str) -> AgentResult<AgentMessage> {
        let worker = self
            .selector
            .select(&self.workers)
            .ok_or_else(|| AgentError::AgentNotFound("no worker configured".to_string()))?;

        self.transition(ManagerPhase::AwaitingResult)?;
        self.rounds += 1;

        Ok(AgentMessage::new(
            self.id,
            worker,
            Message::new(MessageType::SendTask, task),
        ))
    }

    async fn summarize(&mut self, human: AgentId) -> AgentResult<AgentMessage> {
        self.transition(ManagerPhase::Summarizing)?;

        let goal = self.goal.clone().unwrap_or_default();
        self.context.push(
            TurnRole::User,
            library::final_report().render_one("goal", &goal),
        );

        let turns = self.window.apply(self.context.turns());
        let summary = self
            .gateway
            .complete(&turns, ResponseFormat::Text)
            .await?
            .into_content("manager summary")?;

        let report = compose_report(&goal, &summary, self.context.turns());
        self.transition(ManagerPhase::Done)?;

        Ok(AgentMessage::new(
            self.id,
            human,
            Message::new(MessageType::SendSummary, report),
        ))
    }
}

#[async_trait]
impl Agent for ManagerAgent {
    fn id(&self) -> AgentId {
        self.id
    }

    async fn receive(
        &mut self,
        message: Message,
        from: AgentId,
    ) -> AgentResult<Option<AgentMessage>> {
        let reply = match message.message_type {
            MessageType::SendPurpose => self.receive_purpose(message.content(), from).await?,
            MessageType::SendResult => self.receive_result(message.content()).await?,
            other => {
                return Err(AgentError::UnknownMessageType {
                    recipient: self.id,
                    message_type: other,
                })
            }
        };
        Ok(Some(reply))
    }
}
