// src/llm/mod.rs
//! Table-to-figures extraction delegated to a language model.
//!
//! The model sits behind [`CompletionBackend`], so prompt wording and the
//! HTTP API stay out of the rest of the pipeline.

pub mod deepseek;
pub mod json;
pub mod prompt;

use async_trait::async_trait;

use crate::financials::ExtractedFinancials;
use crate::utils::error::LlmError;

pub use deepseek::DeepSeekClient;
use json::{recover_json_object, ModelFinancials};

/// Anything that turns a system prompt plus a user message into raw text.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, system_prompt: &str, user_content: &str) -> Result<String, LlmError>;
}

/// Turns a flattened income statement table into figures via a model.
#[derive(Debug)]
pub struct TableExtractionOracle<B> {
    backend: B,
}

impl<B: CompletionBackend> TableExtractionOracle<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub async fn extract(&self, table_text: &str) -> Result<ExtractedFinancials, LlmError> {
        tracing::info!("Sending income statement table ({} bytes) to the model", table_text.len());
        let content = self
            .backend
            .complete(prompt::SYSTEM_PROMPT, &prompt::user_message(table_text))
            .await?;
        if content.trim().is_empty() {
            return Err(LlmError::EmptyContent(content));
        }

        let value = recover_json_object(&content)?;
        let parsed: ModelFinancials = serde_json::from_value(value).map_err(|source| LlmError::InvalidJson {
            raw: content.clone(),
            source,
        })?;

        let mut fin = parsed.into_financials();
        fin.derive_missing();
        Ok(fin)
    }
}
