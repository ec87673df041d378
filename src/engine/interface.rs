use async_trait::async_trait;

/// A chat-completion backend the engine can ask for a translation.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Short label for logs, e.g. `openai:gpt-4o-mini`.
    fn label(&self) -> &str;

    /// Send one prompt and return the raw completion text.
    async fn complete(&self, prompt: &str) -> anyhow::Result<String>;
}
