use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::config::Config;
use crate::engine::provider_factory::ProviderFactory;
use crate::engine::TranslationEngine;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub engine: Arc<TranslationEngine>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let timeout = Duration::from_secs(config.translator_config.request_timeout_secs);
        let providers =
            ProviderFactory::create_providers(&config.translator_config.providers, timeout)?;
        let engine = Arc::new(TranslationEngine::new(providers)?);

        Ok(Self {
            config,
            engine,
            started_at: Utc::now(),
        })
    }

    /// State over an already-built engine; the tests inject doubles here.
    pub fn with_engine(config: Config, engine: Arc<TranslationEngine>) -> Self {
        Self {
            config,
            engine,
            started_at: Utc::now(),
        }
    }

    pub fn uptime_secs(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }
}
