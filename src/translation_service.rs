use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::controller::error::TranslationError;
use crate::controller::interface::{TranslateRequest, TranslateSuccess, TranslationTransport};

/// HTTP client for the translation service.
///
/// Every request carries a timeout so a hung upstream surfaces as a
/// transport failure instead of an open-ended wait.
#[derive(Debug, Clone)]
pub struct TranslationServiceClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    success: bool,
    #[serde(default)]
    translation: Option<String>,
    #[serde(default)]
    source_language_name: Option<String>,
    #[serde(default)]
    target_language_name: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl TranslationServiceClient {
    pub fn new(base_url: String, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }
}

fn transport_reason(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        "Request timed out".to_string()
    } else {
        err.to_string()
    }
}

#[async_trait]
impl TranslationTransport for TranslationServiceClient {
    async fn translate(
        &self,
        request: TranslateRequest,
    ) -> Result<TranslateSuccess, TranslationError> {
        let url = format!("{}/translate", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| TranslationError::Transport(transport_reason(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranslationError::Transport(format!("HTTP {}", status)));
        }

        let body: WireResponse = response
            .json()
            .await
            .map_err(|e| TranslationError::Transport(format!("Malformed response: {}", e)))?;

        if !body.success {
            return Err(TranslationError::Application(
                body.error
                    .unwrap_or_else(|| "Translation failed".to_string()),
            ));
        }
        match (
            body.translation,
            body.source_language_name,
            body.target_language_name,
        ) {
            (Some(translation), Some(source_language_name), Some(target_language_name)) => {
                Ok(TranslateSuccess {
                    translation,
                    source_language_name,
                    target_language_name,
                })
            }
            _ => Err(TranslationError::Transport(
                "Malformed response: missing fields".to_string(),
            )),
        }
    }
}
