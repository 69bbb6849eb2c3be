// Agent system modules
//
// The human, manager and worker roles, the envelopes they exchange, the
// router that delivers them and the gateway the agents think with.

pub mod baseline;
pub mod errors;
pub mod events;
pub mod gateway;
pub mod human;
pub mod manager;
pub mod messages;
pub mod prompts;
pub mod report;
pub mod router;
pub mod selection;
pub mod session;
pub mod state;
pub mod types;
pub mod worker;

// Re-export main types
pub use errors::{AgentError, AgentResult};
pub use events::{AgentEvent, EventSink, RecordingSink, TracingSink};
pub use gateway::{CompletionGateway, ScriptedGateway};
pub use human::{HumanAgent, PurposeReader, ReportWriter};
pub use manager::ManagerAgent;
pub use messages::{AgentId, AgentMessage, Message, MessageType, Role};
pub use router::{Agent, MessageRouter};
pub use session::{Session, SessionOutcome};
pub use types::{ContextWindow, DelegationDecision};
pub use worker::WorkerAgent;
