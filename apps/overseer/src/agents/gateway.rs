// Language model gateway
//
// The completion service behind both manager and worker. The core only ever
// sees `complete(turns, format)`; the HTTP adapter lives in
// `infrastructure::openai`.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::errors::{AgentError, AgentResult};
use super::types::{Completion, ResponseFormat, Turn};

/// An ordered conversation in, a completion out
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    async fn complete(&self, turns: &[Turn], format: ResponseFormat) -> AgentResult<Completion>;
}

/// A request captured by [`ScriptedGateway`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub turns: Vec<Turn>,
    pub format: ResponseFormat,
}

/// Replays a fixed sequence of completions
///
/// Useful for offline runs and tests. Every request is recorded; asking for
/// more completions than were scripted is a `Service` error.
#[derive(Debug, Default)]
pub struct ScriptedGateway {
    script: Mutex<VecDeque<Completion>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedGateway {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_completions(replies.into_iter().map(Completion::new))
    }

    pub fn from_completions<I>(completions: I) -> Self
    where
        I: IntoIterator<Item = Completion>,
    {
        Self {
            script: Mutex::new(completions.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or_default()
    }

    pub fn remaining(&self) -> usize {
        self.script.lock().map(|s| s.len()).unwrap_or_default()
    }
}

#[async_trait]
impl CompletionGateway for ScriptedGateway {
    async fn complete(&self, turns: &[Turn], format: ResponseFormat) -> AgentResult<Completion> {
        self.requests
            .lock()
            .map_err(|e| AgentError::Service(e.to_string()))?
            .push(RecordedRequest {
                turns: turns.to_vec(),
                format,
            });

        self.script
            .lock()
            .map_err(|e| AgentError::Service(e.to_string()))?
            .pop_front()
            .ok_or_else(|| AgentError::Service("scripted gateway exhausted".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::types::TurnRole;

    #[tokio::test]
    async fn scripted_gateway_replays_in_order() {
        let gateway = ScriptedGateway::new(["one", "two"]);
        let turns = vec![Turn::new(TurnRole::User, "hi")];

        let first = gateway.complete(&turns, ResponseFormat::Text).await.unwrap();
        let second = gateway.complete(&turns, ResponseFormat::Json).await.unwrap();

        assert_eq!(first.text.as_deref(), Some("one"));
        assert_eq!(second.text.as_deref(), Some("two"));
        assert_eq!(gateway.call_count(), 2);
        assert_eq!(gateway.remaining(), 0);
        assert_eq!(gateway.requests()[1].format, ResponseFormat::Json);
    }

    #[tokio::test]
    async fn scripted_gateway_exhaustion_is_service_error() {
        let gateway = ScriptedGateway::new(Vec::<String>::new());

        let result = gateway.complete(&[], ResponseFormat::Text).await;

        assert!(matches!(result, Err(AgentError::Service(_))));
        assert_eq!(gateway.call_count(), 1);
    }

    #[tokio::test]
    async fn scripted_gateway_can_return_empty_completion() {
        let gateway = ScriptedGateway::from_completions([Completion::empty()]);

        let completion = gateway.complete(&[], ResponseFormat::Text).await.unwrap();

        assert!(completion.text.is_none());
    }
}
