//! Chat-completions generator for OpenAI-compatible endpoints.

use std::path::Path;
use std::time::Duration;

use reqwest::blocking::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::{Generator, GeneratorError};
use crate::config::schema::GeneratorConfig;
use crate::error::ConfigError;
use crate::sanitize::sanitize_for_prompt;
use crate::scenario::model::ProcessedFile;
use crate::secrets::resolve_secret;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Response bodies quoted in errors are cut to this many characters.
const MAX_ERROR_BODY_CHARS: usize = 500;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

pub struct ChatGenerator {
    client: Client,
    endpoint: String,
    model: String,
    api_key: SecretString,
    system_prompt: String,
    scenario_prompt: String,
    context_window: usize,
}

impl ChatGenerator {
    /// Creates a generator from configuration, resolving the API key from
    /// `api_key`, `api_key_file` or `api_key_env_var`.
    pub fn from_config(config: &GeneratorConfig) -> Result<Self, ConfigError> {
        let api_key = resolve_secret(
            config.api_key.as_deref(),
            config.api_key_file.as_deref(),
            config.api_key_env_var.as_deref(),
        )?;

        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ConfigError::Validation {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key,
            system_prompt: config.system_prompt.clone(),
            scenario_prompt: config.scenario_prompt.clone(),
            context_window: config.context_window,
        })
    }

    /// User message: the scenario prompt, the criteria and as much extracted
    /// file content as fits in the context window.
    fn build_user_message(&self, criteria: &str, files: &[ProcessedFile]) -> String {
        let mut message = format!(
            "{}\n\nCriteria:\n{}",
            self.scenario_prompt,
            sanitize_for_prompt(criteria.trim())
        );

        let mut budget = self.context_window;
        let mut documents = Vec::new();
        for file in files {
            let Some(info) = file.extracted_info() else {
                continue;
            };
            if budget == 0 {
                tracing::debug!(file = %file_name(&file.source_path), "Context window exhausted, skipping file");
                continue;
            }

            let sanitized = sanitize_for_prompt(info);
            let taken: String = sanitized.chars().take(budget).collect();
            budget -= taken.chars().count();
            documents.push(format!("[{}]\n{}", file_name(&file.source_path), taken));
        }

        if !documents.is_empty() {
            message.push_str("\n\nSource documents:\n\n");
            message.push_str(&documents.join("\n\n"));
        }
        message
    }

    fn parse_response(body: &str) -> Result<String, GeneratorError> {
        let response: ChatResponse = serde_json::from_str(body)
            .map_err(|e| GeneratorError::ResponseParse(e.to_string()))?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| GeneratorError::ResponseParse("response has no choices".to_string()))?;

        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(GeneratorError::EmptyResponse);
        }
        Ok(trimmed.to_string())
    }
}

impl Generator for ChatGenerator {
    fn generate(&self, criteria: &str, files: &[ProcessedFile]) -> Result<String, GeneratorError> {
        let _span = tracing::info_span!("generator.chat", model = %self.model, files = files.len())
            .entered();

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: self.system_prompt.clone(),
                },
                ChatMessage {
                    role: "user",
                    content: self.build_user_message(criteria, files),
                },
            ],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .map_err(|e| GeneratorError::Http(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| GeneratorError::Http(e.to_string()))?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Generator endpoint returned an error");
            return Err(GeneratorError::Status {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let text = Self::parse_response(&body)?;
        tracing::debug!(chars = text.chars().count(), "Scenario generated");
        Ok(text)
    }
}

fn file_name(source_path: &str) -> String {
    Path::new(source_path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(source_path)
        .to_string()
}
