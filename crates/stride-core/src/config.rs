use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, StrideError};

/// Top-level configuration for the Stride storefront.
///
/// Loaded from `stride.toml` in the working directory unless overridden on the
/// command line. Every section is optional in the file and falls back to its
/// defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StrideConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

impl StrideConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: StrideConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| StrideError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// HTTP server and logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Address the HTTP server binds to.
    pub bind_address: String,
    /// HTTP server port.
    pub port: u16,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 8501,
            log_level: "info".to_string(),
        }
    }
}

/// Product catalog source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Path to the products CSV.
    pub path: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: "products.csv".to_string(),
        }
    }
}

/// Shopping assistant settings.
///
/// The API key itself never lives in the config file; `api_key_env` names the
/// environment variable it is read from at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Environment variable holding the chat API key.
    pub api_key_env: String,
    /// Chat model name.
    pub model: String,
    /// Base URL of the OpenAI-compatible API (without `/chat/completions`).
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Number of most recent transcript turns sent with each request.
    pub context_turns: usize,
    /// Maximum accepted user message length in characters.
    pub max_message_chars: usize,
    /// Sampling temperature.
    pub temperature: f32,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_key_env: "OPENAI_API_KEY".to_string(),
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout_secs: 30,
            context_turns: 12,
            max_message_chars: 2000,
            temperature: 0.4,
        }
    }
}

/// Visitor session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Minutes of inactivity after which a session is discarded.
    pub idle_timeout_minutes: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout_minutes: 120,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = StrideConfig::default();
        assert_eq!(config.general.bind_address, "127.0.0.1");
        assert_eq!(config.general.port, 8501);
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.catalog.path, "products.csv");
        assert_eq!(config.assistant.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.assistant.context_turns, 12);
        assert_eq!(config.session.idle_timeout_minutes, 120);
    }

    #[test]
    fn test_load_valid_config() {
        let content = r#"
[general]
bind_address = "0.0.0.0"
port = 9000
log_level = "debug"

[catalog]
path = "/srv/shop/products.csv"

[assistant]
api_key_env = "SHOP_LLM_KEY"
model = "gpt-4o"
base_url = "http://localhost:11434/v1"
timeout_secs = 5
context_turns = 4
max_message_chars = 500
temperature = 0.0

[session]
idle_timeout_minutes = 15
"#;
        let file = create_temp_config(content);
        let config = StrideConfig::load(file.path()).unwrap();
        assert_eq!(config.general.bind_address, "0.0.0.0");
        assert_eq!(config.general.port, 9000);
        assert_eq!(config.catalog.path, "/srv/shop/products.csv");
        assert_eq!(config.assistant.api_key_env, "SHOP_LLM_KEY");
        assert_eq!(config.assistant.base_url, "http://localhost:11434/v1");
        assert_eq!(config.assistant.context_turns, 4);
        assert_eq!(config.session.idle_timeout_minutes, 15);
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let content = r#"
[catalog]
path = "shoes.csv"
"#;
        let file = create_temp_config(content);
        let config = StrideConfig::load(file.path()).unwrap();
        assert_eq!(config.catalog.path, "shoes.csv");
        assert_eq!(config.general.port, 8501);
        assert_eq!(config.assistant.model, "gpt-4o-mini");
    }

    #[test]
    fn test_load_invalid_toml_is_config_error() {
        let file = create_temp_config("[general\nport = ");
        let err = StrideConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, StrideError::Config(_)));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = StrideConfig::load_or_default(Path::new("/nonexistent/stride.toml"));
        assert_eq!(config.catalog.path, "products.csv");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = StrideConfig::default();
        config.general.port = 7777;
        config.assistant.model = "local-model".to_string();
        config.save(&path).unwrap();

        let reloaded = StrideConfig::load(&path).unwrap();
        assert_eq!(reloaded.general.port, 7777);
        assert_eq!(reloaded.assistant.model, "local-model");
        assert_eq!(reloaded.session.idle_timeout_minutes, 120);
    }
}
