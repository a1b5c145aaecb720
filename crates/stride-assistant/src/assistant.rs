//! Assistant capability and request flow.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use stride_catalog::Catalog;
use stride_core::config::AssistantConfig;
use stride_core::types::ChatTurn;
use tracing::{info, warn};

use crate::client::{ChatCompletion, OpenAiChatClient};
use crate::error::AssistantError;
use crate::prompt::system_prompt;

/// Whether the assistant can be used in this process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Capability {
    Enabled { model: String },
    Disabled { reason: String },
}

/// The shopping assistant, enabled or not.
///
/// Built once at startup and shared by every request.
pub struct Assistant {
    backend: Option<Arc<dyn ChatCompletion>>,
    capability: Capability,
    context_turns: usize,
    max_message_chars: usize,
}

impl Assistant {
    /// Read the process environment for the API key named in `config`.
    ///
    /// A missing or blank key, or a client that fails to build, leaves the
    /// assistant disabled. This never fails.
    pub fn from_config(config: &AssistantConfig) -> Self {
        Self::from_lookup(config, |key| std::env::var(key).ok())
    }

    /// Same as [`Assistant::from_config`] with an explicit variable lookup.
    pub fn from_lookup(config: &AssistantConfig, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_key = lookup(&config.api_key_env)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        let Some(api_key) = api_key else {
            info!(env = %config.api_key_env, "No chat API key found, assistant disabled");
            return Self::disabled(config, format!("{} is not set", config.api_key_env));
        };

        match OpenAiChatClient::new(
            api_key,
            config.model.clone(),
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
        ) {
            Ok(client) => {
                info!(model = %config.model, base_url = %config.base_url, "Assistant enabled");
                let client = client.with_temperature(config.temperature);
                Self::with_backend(Arc::new(client), config)
            }
            Err(e) => {
                warn!(error = %e, "Chat client construction failed, assistant disabled");
                Self::disabled(config, e.to_string())
            }
        }
    }

    /// An enabled assistant using the given backend.
    pub fn with_backend(backend: Arc<dyn ChatCompletion>, config: &AssistantConfig) -> Self {
        Self {
            backend: Some(backend),
            capability: Capability::Enabled {
                model: config.model.clone(),
            },
            context_turns: config.context_turns.max(1),
            max_message_chars: config.max_message_chars,
        }
    }

    pub fn disabled(config: &AssistantConfig, reason: impl Into<String>) -> Self {
        Self {
            backend: None,
            capability: Capability::Disabled {
                reason: reason.into(),
            },
            context_turns: config.context_turns.max(1),
            max_message_chars: config.max_message_chars,
        }
    }

    pub fn capability(&self) -> &Capability {
        &self.capability
    }

    pub fn is_enabled(&self) -> bool {
        self.backend.is_some()
    }

    /// Why the assistant is unavailable, if it is.
    pub fn disabled_reason(&self) -> Option<&str> {
        match &self.capability {
            Capability::Disabled { reason } => Some(reason),
            Capability::Enabled { .. } => None,
        }
    }

    /// Check a shopper message before it enters the transcript.
    ///
    /// Returns the trimmed message.
    pub fn validate_message(&self, message: &str) -> Result<String, AssistantError> {
        if let Some(reason) = self.disabled_reason() {
            return Err(AssistantError::Disabled(reason.to_string()));
        }

        let message = message.trim();
        if message.is_empty() {
            return Err(AssistantError::EmptyMessage);
        }
        if message.chars().count() > self.max_message_chars {
            return Err(AssistantError::MessageTooLong(self.max_message_chars));
        }
        Ok(message.to_string())
    }

    /// Ask the backend for the next assistant turn.
    ///
    /// `transcript` must already end with the shopper's new message. Only the
    /// most recent `context_turns` turns are sent.
    pub async fn reply(
        &self,
        shopper_name: &str,
        transcript: &[ChatTurn],
        catalog: &Catalog,
    ) -> Result<String, AssistantError> {
        let Some(backend) = &self.backend else {
            let reason = self.disabled_reason().unwrap_or("no backend configured");
            return Err(AssistantError::Disabled(reason.to_string()));
        };

        let start = transcript.len().saturating_sub(self.context_turns);
        let window = &transcript[start..];
        let prompt = system_prompt(shopper_name, catalog);

        match backend.complete(&prompt, window).await {
            Ok(reply) => Ok(reply),
            Err(e) => {
                warn!(error = %e, "Assistant request failed");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Backend that records what it was sent and replies from a script.
    struct ScriptedBackend {
        reply: Result<String, fn() -> AssistantError>,
        seen: Mutex<Vec<(String, usize)>>,
    }

    impl ScriptedBackend {
        fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing(make: fn() -> AssistantError) -> Self {
            Self {
                reply: Err(make),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChatCompletion for ScriptedBackend {
        async fn complete(
            &self,
            system_prompt: &str,
            turns: &[ChatTurn],
        ) -> Result<String, AssistantError> {
            self.seen
                .lock()
                .unwrap()
                .push((system_prompt.to_string(), turns.len()));
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(make) => Err(make()),
            }
        }
    }

    fn config() -> AssistantConfig {
        AssistantConfig {
            context_turns: 3,
            max_message_chars: 20,
            ..AssistantConfig::default()
        }
    }

    #[test]
    fn test_missing_key_disables() {
        let assistant = Assistant::from_lookup(&config(), |_| None);
        assert!(!assistant.is_enabled());
        assert_eq!(
            assistant.capability(),
            &Capability::Disabled {
                reason: "OPENAI_API_KEY is not set".to_string()
            }
        );
    }

    #[test]
    fn test_blank_key_disables() {
        let assistant = Assistant::from_lookup(&config(), |_| Some("   ".to_string()));
        assert!(!assistant.is_enabled());
    }

    #[test]
    fn test_key_present_enables() {
        let cfg = config();
        let assistant = Assistant::from_lookup(&cfg, |key| {
            (key == "OPENAI_API_KEY").then(|| "sk-live".to_string())
        });
        assert!(assistant.is_enabled());
        assert_eq!(
            assistant.capability(),
            &Capability::Enabled {
                model: cfg.model.clone()
            }
        );
    }

    #[test]
    fn test_custom_key_variable() {
        let cfg = AssistantConfig {
            api_key_env: "SHOP_LLM_KEY".to_string(),
            ..config()
        };
        let assistant = Assistant::from_lookup(&cfg, |key| {
            (key == "OPENAI_API_KEY").then(|| "sk-live".to_string())
        });
        assert!(!assistant.is_enabled());
        assert_eq!(assistant.disabled_reason(), Some("SHOP_LLM_KEY is not set"));
    }

    #[test]
    fn test_validate_message() {
        let assistant =
            Assistant::with_backend(Arc::new(ScriptedBackend::replying("ok")), &config());
        assert_eq!(assistant.validate_message("  hi  ").unwrap(), "hi");
        assert!(matches!(
            assistant.validate_message("   "),
            Err(AssistantError::EmptyMessage)
        ));
        assert!(matches!(
            assistant.validate_message("this message is far too long"),
            Err(AssistantError::MessageTooLong(20))
        ));
    }

    #[test]
    fn test_validate_message_when_disabled() {
        let assistant = Assistant::disabled(&config(), "no key");
        assert!(matches!(
            assistant.validate_message("hi"),
            Err(AssistantError::Disabled(_))
        ));
    }

    #[tokio::test]
    async fn test_reply_sends_recent_window() {
        let backend = Arc::new(ScriptedBackend::replying("Try the Pegasus."));
        let assistant = Assistant::with_backend(backend.clone(), &config());

        let transcript = vec![
            ChatTurn::user("a"),
            ChatTurn::assistant("b"),
            ChatTurn::user("c"),
            ChatTurn::assistant("d"),
            ChatTurn::user("e"),
        ];
        let reply = assistant
            .reply("Taha", &transcript, &Catalog::default())
            .await
            .unwrap();
        assert_eq!(reply, "Try the Pegasus.");

        let seen = backend.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].1, 3);
        assert!(seen[0].0.contains("Taha"));
    }

    #[tokio::test]
    async fn test_reply_disabled() {
        let assistant = Assistant::disabled(&config(), "OPENAI_API_KEY is not set");
        let err = assistant
            .reply("", &[ChatTurn::user("hi")], &Catalog::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AssistantError::Disabled(_)));
    }

    #[tokio::test]
    async fn test_reply_propagates_upstream_failure() {
        let backend = Arc::new(ScriptedBackend::failing(|| AssistantError::Http {
            status: 500,
            message: "overloaded".to_string(),
        }));
        let assistant = Assistant::with_backend(backend, &config());
        let err = assistant
            .reply("", &[ChatTurn::user("hi")], &Catalog::default())
            .await
            .unwrap_err();
        assert!(err.is_upstream());
    }
}
