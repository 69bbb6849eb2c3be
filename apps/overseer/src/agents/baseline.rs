// Single-shot baseline
//
// Answers the goal with one completion and no delegation, for comparing
// against a full session.

use super::errors::AgentResult;
use super::gateway::CompletionGateway;
use super::types::{ResponseFormat, Turn, TurnRole};

pub async fn direct_answer(gateway: &dyn CompletionGateway, goal: &str) -> AgentResult<String> {
    let turns = [Turn::new(TurnRole::User, goal)];

    gateway
        .complete(&turns, ResponseFormat::Text)
        .await?
        .into_content("baseline answer")
}
