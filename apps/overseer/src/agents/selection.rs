use super::errors::{AgentError, AgentResult};
use super::messages::AgentId;

/// Chooses which worker receives the next task
pub trait WorkerSelector: Send {
    fn select(&mut self, workers: &[AgentId]) -> Option<AgentId>;
}

/// Always the first configured worker
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstWorker;

impl WorkerSelector for FirstWorker {
    fn select(&mut self, workers: &[AgentId]) -> Option<AgentId> {
        workers.first().copied()
    }
}

/// Cycles through the workers in order
#[derive(Debug, Clone, Copy, Default)]
pub struct RoundRobin {
    next: usize,
}

impl WorkerSelector for RoundRobin {
    fn select(&mut self, workers: &[AgentId]) -> Option<AgentId> {
        if workers.is_empty() {
            return None;
        }
        let chosen = workers[self.next % workers.len()];
        self.next = self.next.wrapping_add(1);
        Some(chosen)
    }
}

/// Named selection strategies, as written in configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WorkerSelection {
    #[default]
    First,
    RoundRobin,
}

impl WorkerSelection {
    pub fn parse(value: &str) -> AgentResult<Self> {
        match value.trim().to_lowercase().as_str() {
            "first" => Ok(WorkerSelection::First),
            "round-robin" | "round_robin" | "roundrobin" => Ok(WorkerSelection::RoundRobin),
            other => Err(AgentError::ConfigError(format!(
                "unknown worker selection strategy: {other}"
            ))),
        }
    }

    pub fn selector(&self) -> Box<dyn WorkerSelector> {
        match self {
            WorkerSelection::First => Box::new(FirstWorker),
            WorkerSelection::RoundRobin => Box::<RoundRobin>::default(),
        }
    }
}
