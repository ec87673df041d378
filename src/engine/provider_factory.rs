use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use reqwest::Client;
use tracing::info;

use super::interface::CompletionProvider;
use super::ollama::OllamaProvider;
use super::openai_compatible::OpenAiCompatibleProvider;
use crate::config::ProviderConfig;

/// Factory for completion providers.
pub struct ProviderFactory;

impl ProviderFactory {
    /// Create a provider from one config entry.
    pub fn create_provider(
        config: &ProviderConfig,
        timeout: Duration,
    ) -> Result<Arc<dyn CompletionProvider>> {
        info!("Initializing provider: {} ({})", config.kind, config.model);
        let client = Client::builder().timeout(timeout).build()?;

        match config.kind.as_str() {
            "openai_compatible" | "openai" | "groq" | "mistral" | "deepseek" => {
                Ok(Arc::new(OpenAiCompatibleProvider::new(
                    client,
                    config.model.clone(),
                    config.base_url.clone(),
                    config.api_key.clone().unwrap_or_default(),
                    config.temperature,
                )))
            }
            "ollama" => Ok(Arc::new(OllamaProvider::new(
                client,
                config.model.clone(),
                config.base_url.clone(),
                config.temperature,
            ))),
            other => Err(anyhow::anyhow!("Unsupported provider kind: {}", other)),
        }
    }

    /// Create the full provider set the engine will race.
    pub fn create_providers(
        configs: &[ProviderConfig],
        timeout: Duration,
    ) -> Result<Vec<Arc<dyn CompletionProvider>>> {
        configs
            .iter()
            .map(|c| Self::create_provider(c, timeout))
            .collect()
    }
}
