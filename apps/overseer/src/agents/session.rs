use std::sync::Arc;

use super::errors::AgentResult;
use super::events::EventSink;
use super::human::HumanAgent;
use super::manager::ManagerAgent;
use super::messages::AgentId;
use super::router::{Agent, MessageRouter};
use super::worker::WorkerAgent;

/// Summary of a finished session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOutcome {
    pub human: AgentId,
    pub manager: AgentId,
    /// Envelopes delivered, the initial purpose included
    pub deliveries: usize,
}

/// One human, one manager and its workers wired to a router
pub struct Session {
    human: HumanAgent,
    manager: ManagerAgent,
    workers: Vec<WorkerAgent>,
    sink: Arc<dyn EventSink>,
}

impl Session {
    pub fn new(
        human: HumanAgent,
        manager: ManagerAgent,
        workers: Vec<WorkerAgent>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            human,
            manager,
            workers,
            sink,
        }
    }

    /// Send `goal` to the manager and drive the conversation to completion
    ///
    /// Returns once the report has reached the human's output, or with the
    /// first error any agent raised.
    pub async fn run(self, goal: &str) -> AgentResult<SessionOutcome> {
        let mut router = MessageRouter::new(self.sink);

        let purpose = self.human.send_purpose(goal, self.manager.id());
        let human = router.register(Box::new(self.human));
        let manager = router.register(Box::new(self.manager));
        for worker in self.workers {
            router.register(Box::new(worker));
        }

        tracing::info!(%human, %manager, "session started");
        router.send(purpose);
        let deliveries = router.run().await?;
        tracing::info!(%manager, deliveries, "session finished");

        Ok(SessionOutcome {
            human,
            manager,
            deliveries,
        })
    }
}
