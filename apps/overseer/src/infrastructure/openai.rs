// OpenAI-compatible chat completions adapter

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::agents::errors::{AgentError, AgentResult};
use crate::agents::gateway::CompletionGateway;
use crate::agents::types::{Completion, ResponseFormat, Turn, TurnRole};

/// Connection settings for an OpenAI-compatible chat completions endpoint
#[derive(Debug, Clone)]
pub struct OpenAiSettings {
    pub api_base: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout: Duration,
}

/// Gateway backed by `POST {api_base}/chat/completions`
#[derive(Debug, Clone)]
pub struct OpenAiGateway {
    http: reqwest::Client,
    settings: OpenAiSettings,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: TurnRole,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormatSpec>,
}

#[derive(Serialize)]
struct ResponseFormatSpec {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl OpenAiGateway {
    pub fn new(settings: OpenAiSettings) -> AgentResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| AgentError::Service(e.to_string()))?;

        Ok(Self { http, settings })
    }

    pub fn model(&self) -> &str {
        &self.settings.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.settings.api_base.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl CompletionGateway for OpenAiGateway {
    async fn complete(&self, turns: &[Turn], format: ResponseFormat) -> AgentResult<Completion> {
        let request = ChatRequest {
            model: &self.settings.model,
            messages: turns
                .iter()
                .map(|t| ChatMessage {
                    role: t.role,
                    content: &t.text,
                })
                .collect(),
            response_format: match format {
                ResponseFormat::Json => Some(ResponseFormatSpec {
                    kind: "json_object",
                }),
                ResponseFormat::Text => None,
            },
        };

        let mut http_request = self.http.post(self.endpoint()).json(&request);
        if let Some(key) = &self.settings.api_key {
            http_request = http_request.bearer_auth(key);
        }

        tracing::debug!(
            model = %self.settings.model,
            turns = turns.len(),
            ?format,
            "requesting completion"
        );

        let response = http_request
            .send()
            .await
            .map_err(|e| AgentError::Service(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::Service(format!("HTTP {}: {}", status, body)));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| AgentError::Service(e.to_string()))?;

        let choice = chat_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AgentError::Service("No choices in response".to_string()))?;

        Ok(Completion {
            text: choice.message.content,
        })
    }
}
