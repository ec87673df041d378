use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub system_config: SystemConfig,
    #[serde(default)]
    pub translator_config: TranslatorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatorConfig {
    /// Completion backends raced for every translation.
    #[serde(default)]
    pub providers: Vec<ProviderConfig>,
    /// Hard cap on input length, counted in characters after trimming.
    #[serde(default = "default_max_input_chars")]
    pub max_input_chars: usize,
    /// Quiet period before an input change triggers a translation.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Upper bound on any outbound request, so a hung upstream returns an
    /// error instead of pinning a request forever.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider kind, e.g. `openai_compatible` or `ollama`.
    pub kind: String,
    pub model: String,
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_max_input_chars() -> usize {
    5000
}

fn default_debounce_ms() -> u64 {
    1500
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_temperature() -> f32 {
    0.7
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)?;

        // Determine file type by extension
        let path_lower = path.to_lowercase();
        if path_lower.ends_with(".json") {
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            let config: Config = serde_yaml::from_str(&content)?;
            Ok(config)
        }
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            providers: Vec::new(),
            max_input_chars: default_max_input_chars(),
            debounce_ms: default_debounce_ms(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_with_defaults() {
        let yaml = r#"
system_config:
  port: 8080
translator_config:
  providers:
    - kind: openai_compatible
      model: gpt-4o-mini
      base_url: https://api.example.com/v1
      api_key: sk-test
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.system_config.port, 8080);
        assert_eq!(config.system_config.host, "0.0.0.0");
        assert_eq!(config.translator_config.max_input_chars, 5000);
        assert_eq!(config.translator_config.debounce_ms, 1500);
        assert_eq!(config.translator_config.request_timeout_secs, 30);
        assert_eq!(config.translator_config.providers.len(), 1);
        assert_eq!(config.translator_config.providers[0].temperature, 0.7);
    }

    #[test]
    fn empty_config_is_usable() {
        let config = Config::default();
        assert_eq!(config.system_config.port, 5000);
        assert!(config.translator_config.providers.is_empty());
    }
}
