// src/llm/deepseek.rs
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::llm::CompletionBackend;
use crate::utils::config::LlmSettings;
use crate::utils::error::LlmError;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// OpenAI-compatible chat-completions client for DeepSeek.
pub struct DeepSeekClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl DeepSeekClient {
    pub fn new(settings: &LlmSettings) -> Result<Self, LlmError> {
        let api_key = settings.api_key.clone().ok_or(LlmError::MissingApiKey)?;
        Ok(Self {
            http: reqwest::Client::builder().build()?,
            api_key,
            model: settings.model.clone(),
            endpoint: settings.endpoint.clone(),
        })
    }
}

#[async_trait]
impl CompletionBackend for DeepSeekClient {
    async fn complete(&self, system_prompt: &str, user_content: &str) -> Result<String, LlmError> {
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage { role: "system", content: system_prompt.trim() },
                ChatMessage { role: "user", content: user_content },
            ],
            temperature: 0.0,
        };

        tracing::debug!("POST {} (model {})", self.endpoint, self.model);
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            tracing::error!("Model endpoint returned {}", status);
            return Err(LlmError::Http { status, body });
        }

        content_from_response(&body)
    }
}

/// Pulls `choices[0].message.content` out of a chat-completions body.
pub fn content_from_response(body: &str) -> Result<String, LlmError> {
    let data: Value =
        serde_json::from_str(body).map_err(|_| LlmError::UnexpectedResponse(body.to_string()))?;

    if let Some(error) = data.get("error").filter(|e| !e.is_null()) {
        return Err(LlmError::Api(error.to_string()));
    }

    let content = data
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .ok_or_else(|| LlmError::UnexpectedResponse(body.to_string()))?;

    if content.trim().is_empty() {
        return Err(LlmError::EmptyContent(body.to_string()));
    }
    Ok(content.to_string())
}
