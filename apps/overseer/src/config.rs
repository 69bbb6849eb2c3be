// Runtime configuration
//
// Read from environment variables (a `.env` file is loaded by the binary
// first). Empty values count as unset.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::agents::errors::{AgentError, AgentResult};
use crate::agents::selection::WorkerSelection;
use crate::agents::types::ContextWindow;
use crate::infrastructure::openai::OpenAiSettings;

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo-1106";
pub const DEFAULT_OUTPUT_DIR: &str = "outputs";
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Clone, PartialEq)]
pub struct OverseerConfig {
    pub api_base: String,
    pub api_key: Option<String>,
    pub manager_model: String,
    pub worker_model: String,
    pub output_dir: PathBuf,
    pub worker_count: usize,
    pub max_rounds: Option<u32>,
    pub context_window: ContextWindow,
    pub worker_selection: WorkerSelection,
    pub request_timeout: Duration,
}

impl Default for OverseerConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: None,
            manager_model: DEFAULT_MODEL.to_string(),
            worker_model: DEFAULT_MODEL.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            worker_count: 1,
            max_rounds: None,
            context_window: ContextWindow::Unbounded,
            worker_selection: WorkerSelection::First,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl OverseerConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> AgentResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key/value source
    pub fn from_lookup<F>(lookup: F) -> AgentResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let manager_model = get("OVERSEER_MANAGER_MODEL").unwrap_or(defaults.manager_model);
        let worker_model = get("OVERSEER_WORKER_MODEL").unwrap_or_else(|| manager_model.clone());

        let worker_count = match get("OVERSEER_WORKERS") {
            Some(value) => parse_number::<usize>("OVERSEER_WORKERS", &value)?,
            None => defaults.worker_count,
        };
        if worker_count == 0 {
            return Err(AgentError::ConfigError(
                "OVERSEER_WORKERS must be at least 1".to_string(),
            ));
        }

        let max_rounds = get("OVERSEER_MAX_ROUNDS")
            .map(|value| parse_number::<u32>("OVERSEER_MAX_ROUNDS", &value))
            .transpose()?;
        if max_rounds == Some(0) {
            return Err(AgentError::ConfigError(
                "OVERSEER_MAX_ROUNDS must be at least 1".to_string(),
            ));
        }

        let context_window = match get("OVERSEER_CONTEXT_WINDOW") {
            Some(value) => match parse_number::<usize>("OVERSEER_CONTEXT_WINDOW", &value)? {
                0 => {
                    return Err(AgentError::ConfigError(
                        "OVERSEER_CONTEXT_WINDOW must be at least 1".to_string(),
                    ))
                }
                n => ContextWindow::Recent(n),
            },
            None => defaults.context_window,
        };

        let worker_selection = match get("OVERSEER_WORKER_SELECTION") {
            Some(value) => WorkerSelection::parse(&value)?,
            None => defaults.worker_selection,
        };

        let request_timeout = match get("OVERSEER_REQUEST_TIMEOUT_SECS") {
            Some(value) => Duration::from_secs(parse_number::<u64>(
                "OVERSEER_REQUEST_TIMEOUT_SECS",
                &value,
            )?),
            None => defaults.request_timeout,
        };

        Ok(Self {
            api_base: get("OVERSEER_API_BASE").unwrap_or(defaults.api_base),
            api_key: get("OPENAI_API_KEY"),
            manager_model,
            worker_model,
            output_dir: get("OVERSEER_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            worker_count,
            max_rounds,
            context_window,
            worker_selection,
            request_timeout,
        })
    }

    /// Whether the completion service runs on this machine
    pub fn is_local_api(&self) -> bool {
        let authority = self
            .api_base
            .split_once("://")
            .map_or(self.api_base.as_str(), |(_, rest)| rest);
        let authority = authority.split('/').next().unwrap_or_default();
        let host = match authority.strip_prefix('[') {
            Some(v6) => v6.split(']').next().unwrap_or_default(),
            None => authority.split(':').next().unwrap_or_default(),
        };

        matches!(host, "localhost" | "127.0.0.1" | "::1" | "0.0.0.0")
    }

    /// A remote completion service needs `OPENAI_API_KEY`
    pub fn require_credentials(&self) -> AgentResult<()> {
        if self.api_key.is_none() && !self.is_local_api() {
            return Err(AgentError::ConfigError(format!(
                "OPENAI_API_KEY is required for {}",
                self.api_base
            )));
        }
        Ok(())
    }

    pub fn manager_settings(&self) -> OpenAiSettings {
        self.settings_for(&self.manager_model)
    }

    pub fn worker_settings(&self) -> OpenAiSettings {
        self.settings_for(&self.worker_model)
    }

    fn settings_for(&self, model: &str) -> OpenAiSettings {
        OpenAiSettings {
            api_base: self.api_base.clone(),
            api_key: self.api_key.clone(),
            model: model.to_string(),
            timeout: self.request_timeout,
        }
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> AgentResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| AgentError::ConfigError(format!("{key} is not a valid number: {value}")))
}
