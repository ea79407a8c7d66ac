// src/utils/config.rs
use std::time::Duration;

use crate::utils::error::AppError;

// SEC asks for a descriptive User-Agent with a contact address. Override via SEC_USER_AGENT.
pub const DEFAULT_USER_AGENT: &str = "TenkMargins/0.1 research-contact@example.com";
// SEC asks for 10 requests/second max. Be conservative. >100ms delay.
pub const DEFAULT_REQUEST_DELAY_MS: u64 = 150;

pub const DEFAULT_LLM_MODEL: &str = "deepseek-chat";
pub const DEFAULT_LLM_ENDPOINT: &str = "https://api.deepseek.com/chat/completions";

#[derive(Debug, Clone)]
pub struct EdgarSettings {
    pub user_agent: String,
    pub request_delay: Duration,
}

impl EdgarSettings {
    /// True when no contact string was configured and the built-in placeholder is sent.
    pub fn uses_placeholder_contact(&self) -> bool {
        self.user_agent == DEFAULT_USER_AGENT
    }
}

#[derive(Clone)]
pub struct LlmSettings {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
}

// Hand-written so the API key never ends up in logs.
impl std::fmt::Debug for LlmSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub edgar: EdgarSettings,
    pub llm: LlmSettings,
}

impl Settings {
    /// Builds settings from the process environment (after `.env` has been loaded).
    /// `user_agent_override` comes from the command line and beats `SEC_USER_AGENT`.
    pub fn from_env(user_agent_override: Option<String>) -> Result<Self, AppError> {
        Self::from_lookup(user_agent_override, |key| std::env::var(key).ok())
    }

    fn from_lookup<F>(user_agent_override: Option<String>, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let user_agent = user_agent_override
            .or_else(|| lookup("SEC_USER_AGENT"))
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());
        let user_agent = user_agent.trim().to_string();
        if user_agent.is_empty() {
            return Err(AppError::Config(
                "SEC requires a User-Agent with contact details; SEC_USER_AGENT is empty".to_string(),
            ));
        }
        if !user_agent.contains('@') {
            tracing::warn!("User-Agent '{}' has no contact email; SEC may reject requests", user_agent);
        }

        let delay_ms = match lookup("EDGAR_REQUEST_DELAY_MS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                AppError::Config(format!("EDGAR_REQUEST_DELAY_MS must be an integer, got '{}'", raw))
            })?,
            None => DEFAULT_REQUEST_DELAY_MS,
        };

        let api_key = lookup("DEEPSEEK_API_KEY").filter(|key| !key.trim().is_empty());

        Ok(Self {
            edgar: EdgarSettings {
                user_agent,
                request_delay: Duration::from_millis(delay_ms),
            },
            llm: LlmSettings {
                api_key,
                model: lookup("DEEPSEEK_MODEL").unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
                endpoint: lookup("DEEPSEEK_ENDPOINT").unwrap_or_else(|| DEFAULT_LLM_ENDPOINT.to_string()),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        let settings = Settings::from_lookup(None, lookup_from(&[])).unwrap();
        assert_eq!(settings.edgar.user_agent, DEFAULT_USER_AGENT);
        assert!(settings.edgar.uses_placeholder_contact());
        assert_eq!(settings.edgar.request_delay, Duration::from_millis(DEFAULT_REQUEST_DELAY_MS));
        assert!(settings.llm.api_key.is_none());
        assert_eq!(settings.llm.model, DEFAULT_LLM_MODEL);
        assert_eq!(settings.llm.endpoint, DEFAULT_LLM_ENDPOINT);
    }

    #[test]
    fn command_line_user_agent_beats_environment() {
        let env = lookup_from(&[("SEC_USER_AGENT", "Env Agent env@example.com")]);
        let settings = Settings::from_lookup(Some("Cli Agent cli@example.com".into()), env).unwrap();
        assert_eq!(settings.edgar.user_agent, "Cli Agent cli@example.com");
        assert!(!settings.edgar.uses_placeholder_contact());
    }

    #[test]
    fn blank_user_agent_is_a_config_error() {
        let env = lookup_from(&[("SEC_USER_AGENT", "   ")]);
        let err = Settings::from_lookup(None, env).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn bad_delay_is_rejected() {
        let env = lookup_from(&[("EDGAR_REQUEST_DELAY_MS", "fast")]);
        assert!(Settings::from_lookup(None, env).is_err());
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let env = lookup_from(&[("DEEPSEEK_API_KEY", ""), ("DEEPSEEK_MODEL", "deepseek-reasoner")]);
        let settings = Settings::from_lookup(None, env).unwrap();
        assert!(settings.llm.api_key.is_none());
        assert_eq!(settings.llm.model, "deepseek-reasoner");
        assert!(!format!("{:?}", settings).contains("sk-"));
    }
}
