use serde::{Deserialize, Serialize};

/// Lifecycle phase of the manager's orchestration state machine
///
/// # Phase Transitions
/// ```text
/// AwaitingPurpose -> Delegating -> AwaitingResult -> Summarizing -> Done
///                        ^               |
///                        └---------------┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ManagerPhase {
    /// No goal has been received yet
    AwaitingPurpose,
    /// Choosing a worker and sending it a task
    Delegating,
    /// A task is out; waiting for the worker's result
    AwaitingResult,
    /// Asking the model for the final report
    Summarizing,
    /// The report has been sent to the human
    Done,
}

impl ManagerPhase {
    /// Checks if a transition from the current phase to `next` is valid
    ///
    /// # Example
    /// ```
    /// use overseer::agents::state::ManagerPhase;
    ///
    /// assert!(ManagerPhase::AwaitingPurpose.can_transition_to(ManagerPhase::Delegating));
    /// assert!(!ManagerPhase::AwaitingPurpose.can_transition_to(ManagerPhase::Summarizing));
    /// ```
    pub fn can_transition_to(&self, next: ManagerPhase) -> bool {
        use ManagerPhase::*;
        matches!(
            (self, next),
            (AwaitingPurpose, Delegating)
                | (Delegating, AwaitingResult)
                | (AwaitingResult, Delegating)
                | (AwaitingResult, Summarizing)
                | (Summarizing, Done)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ManagerPhase::Done)
    }
}

impl std::fmt::Display for ManagerPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ManagerPhase::AwaitingPurpose => write!(f, "awaiting_purpose"),
            ManagerPhase::Delegating => write!(f, "delegating"),
            ManagerPhase::AwaitingResult => write!(f, "awaiting_result"),
            ManagerPhase::Summarizing => write!(f, "summarizing"),
            ManagerPhase::Done => write!(f, "done"),
        }
    }
}
