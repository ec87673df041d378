use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::TranslationError;
use crate::languages::Language;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateRequest {
    pub text: String,
    pub source_lang: Language,
    pub target_lang: Language,
}

/// A successful answer from the translation service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateSuccess {
    pub translation: String,
    pub source_language_name: String,
    pub target_language_name: String,
}

/// Request/response channel to the remote translation service.
#[async_trait]
pub trait TranslationTransport: Send + Sync {
    async fn translate(
        &self,
        request: TranslateRequest,
    ) -> Result<TranslateSuccess, TranslationError>;
}

/// Read/write access to a clipboard. Failures surface through the
/// notification sink, not as process errors.
pub trait Clipboard: Send + Sync {
    fn read_text(&self) -> anyhow::Result<String>;
    fn write_text(&self, text: &str) -> anyhow::Result<()>;
}
