use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::interface::CompletionProvider;

/// Provider speaking the OpenAI chat-completions dialect. Covers OpenAI
/// itself and the many services exposing the same API surface.
pub struct OpenAiCompatibleProvider {
    label: String,
    client: Client,
    model: String,
    base_url: String,
    api_key: String,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

impl OpenAiCompatibleProvider {
    pub fn new(
        client: Client,
        model: String,
        base_url: String,
        api_key: String,
        temperature: f32,
    ) -> Self {
        info!(
            "Initialized OpenAiCompatibleProvider: model={}, base_url={}",
            model, base_url
        );
        Self {
            label: format!("openai:{}", model),
            client,
            model,
            base_url,
            api_key,
            temperature,
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenAiCompatibleProvider {
    fn label(&self) -> &str {
        &self.label
    }

    async fn complete(&self, prompt: &str) -> anyhow::Result<String> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        if !response.status().is_success() {
            anyhow::bail!("{} returned HTTP {}", self.label, response.status());
        }

        let parsed: ChatCompletionResponse = response.json().await?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| anyhow::anyhow!("{} returned no choices", self.label))?;
        Ok(content)
    }
}
