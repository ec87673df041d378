pub mod interface;
pub mod ollama;
pub mod openai_compatible;
pub mod prompt;
pub mod provider_factory;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use anyhow::Result;
use dashmap::DashMap;
use futures::future::select_ok;
use regex::{NoExpand, Regex};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::languages::{detect_likely_language, Language};
use interface::CompletionProvider;
use prompt::{build_fallback_prompt, build_translation_prompt, clean_translation};

// Replies at or under this many bytes lose the race; models sometimes
// answer with a bare "OK" or an empty string.
const MIN_RACE_REPLY_BYTES: usize = 3;

/// A finished translation.
#[derive(Debug, Clone)]
pub struct TranslationOutcome {
    pub translation: String,
    /// The concrete source language, detected when the caller passed auto.
    pub detected: Language,
    pub from_cache: bool,
}

/// Translation engine: caches, provider racing, and prompt handling.
///
/// The same prompt is submitted to every configured provider at once and
/// the first plausible completion wins; a terse retry on the primary
/// provider is the last resort.
pub struct TranslationEngine {
    providers: Vec<Arc<dyn CompletionProvider>>,
    phrase_cache: DashMap<String, String>,
    word_cache: DashMap<String, String>,
    word_pattern: Regex,
}

impl TranslationEngine {
    pub fn new(providers: Vec<Arc<dyn CompletionProvider>>) -> Result<Self> {
        Ok(Self {
            providers,
            phrase_cache: DashMap::new(),
            word_cache: DashMap::new(),
            word_pattern: Regex::new(r"\b\w+\b")?,
        })
    }

    pub async fn translate(
        &self,
        text: &str,
        source: Language,
        target: Language,
    ) -> Result<TranslationOutcome> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            anyhow::bail!("Empty text");
        }
        if target.is_auto() {
            anyhow::bail!("Target language cannot be auto");
        }
        let resolved = if source.is_auto() {
            detect_likely_language(trimmed)
        } else {
            source
        };

        let key = phrase_key(trimmed, resolved, target);
        if let Some(hit) = self.phrase_cache.get(&key) {
            debug!("phrase cache hit for {} -> {}", resolved, target);
            return Ok(TranslationOutcome {
                translation: hit.value().clone(),
                detected: resolved,
                from_cache: true,
            });
        }

        if let Some(rebuilt) = self.reconstruct_from_word_cache(trimmed, resolved, target) {
            info!("reconstructed translation from word cache");
            self.phrase_cache.insert(key, rebuilt.clone());
            return Ok(TranslationOutcome {
                translation: rebuilt,
                detected: resolved,
                from_cache: true,
            });
        }

        let translation = self.translate_with_providers(trimmed, resolved, target).await?;
        self.phrase_cache.insert(key, translation.clone());
        self.cache_word_pairs(trimmed, &translation, resolved, target);
        Ok(TranslationOutcome {
            translation,
            detected: resolved,
            from_cache: false,
        })
    }

    async fn translate_with_providers(
        &self,
        text: &str,
        source: Language,
        target: Language,
    ) -> Result<String> {
        if self.providers.is_empty() {
            anyhow::bail!("No translation providers configured");
        }

        let request_id = Uuid::new_v4();
        let prompt = build_translation_prompt(text, source.display_name(), target.display_name());
        info!(
            %request_id,
            "racing {} providers for {} -> {}",
            self.providers.len(),
            source,
            target
        );

        let racers: Vec<CompletionFuture> = self
            .providers
            .iter()
            .map(|provider| {
                let provider = Arc::clone(provider);
                let prompt = prompt.clone();
                Box::pin(async move {
                    let reply = provider.complete(&prompt).await?;
                    let cleaned = clean_translation(&reply);
                    if cleaned.len() > MIN_RACE_REPLY_BYTES {
                        Ok(cleaned)
                    } else {
                        anyhow::bail!("{} returned an implausibly short reply", provider.label())
                    }
                }) as CompletionFuture
            })
            .collect();

        match select_ok(racers).await {
            Ok((winner, _slower)) => Ok(winner),
            Err(race_err) => {
                warn!(%request_id, "no provider won the race: {}", race_err);
                let fallback =
                    build_fallback_prompt(text, source.display_name(), target.display_name());
                let reply = self.providers[0].complete(&fallback).await?;
                let cleaned = clean_translation(&reply);
                if cleaned.is_empty() {
                    anyhow::bail!("Fallback translation came back empty");
                }
                Ok(cleaned)
            }
        }
    }

    /// Rebuild a translation purely from cached word pairs. Only fires
    /// when every word of the input is already cached; partial splicing
    /// is not worth the garbled grammar.
    fn reconstruct_from_word_cache(
        &self,
        text: &str,
        source: Language,
        target: Language,
    ) -> Option<String> {
        let lowered = text.to_lowercase();
        let words: Vec<&str> = {
            let mut seen = Vec::new();
            for m in self.word_pattern.find_iter(&lowered) {
                if !seen.contains(&m.as_str()) {
                    seen.push(m.as_str());
                }
            }
            seen
        };
        if words.is_empty() {
            return None;
        }

        let mut pairs = Vec::with_capacity(words.len());
        for word in &words {
            let cached = self.word_cache.get(&word_key(word, source, target))?;
            pairs.push((word.to_string(), cached.value().clone()));
        }

        let mut result = lowered;
        for (word, translation) in pairs {
            let pattern = Regex::new(&format!(r"\b{}\b", regex::escape(&word))).ok()?;
            result = pattern
                .replace_all(&result, NoExpand(&translation))
                .into_owned();
        }
        Some(result)
    }

    /// Cache positionally aligned word pairs from a finished translation.
    fn cache_word_pairs(&self, text: &str, translation: &str, source: Language, target: Language) {
        let lowered_text = text.to_lowercase();
        let lowered_translation = translation.to_lowercase();
        let originals: Vec<&str> = self
            .word_pattern
            .find_iter(&lowered_text)
            .map(|m| m.as_str())
            .collect();
        let translated: Vec<&str> = self
            .word_pattern
            .find_iter(&lowered_translation)
            .map(|m| m.as_str())
            .collect();

        let pairs = originals.len().min(translated.len());
        for i in 0..pairs {
            self.word_cache
                .insert(word_key(originals[i], source, target), translated[i].to_string());
        }
        debug!("cached {} word pairs", pairs);
    }

    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            phrases: self.phrase_cache.len(),
            words: self.word_cache.len(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CacheStats {
    pub phrases: usize,
    pub words: usize,
}

type CompletionFuture = Pin<Box<dyn Future<Output = Result<String>> + Send>>;

fn phrase_key(text: &str, source: Language, target: Language) -> String {
    let digest = md5::compute(text.to_lowercase());
    format!("{}_{}:{:x}", source.code(), target.code(), digest)
}

fn word_key(word: &str, source: Language, target: Language) -> String {
    let digest = md5::compute(word.trim().to_lowercase());
    format!("word_{}_{}:{:x}", source.code(), target.code(), digest)
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::interface::CompletionProvider;

    /// Provider double that replies with a fixed string.
    pub struct StaticProvider {
        label: String,
        reply: String,
        pub calls: AtomicUsize,
    }

    impl StaticProvider {
        pub fn new(label: &str, reply: &str) -> Self {
            Self {
                label: label.to_string(),
                reply: reply.to_string(),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CompletionProvider for StaticProvider {
        fn label(&self) -> &str {
            &self.label
        }

        async fn complete(&self, _prompt: &str) -> anyhow::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.reply.clone())
        }
    }

    /// Provider double that always errors.
    pub struct BrokenProvider;

    #[async_trait]
    impl CompletionProvider for BrokenProvider {
        fn label(&self) -> &str {
            "broken"
        }

        async fn complete(&self, _prompt: &str) -> anyhow::Result<String> {
            anyhow::bail!("connection refused")
        }
    }

    /// Provider double that fails a number of calls before succeeding.
    pub struct FlakyProvider {
        failures_left: Mutex<usize>,
        reply: String,
        pub calls: AtomicUsize,
    }

    impl FlakyProvider {
        pub fn new(failures: usize, reply: &str) -> Self {
            Self {
                failures_left: Mutex::new(failures),
                reply: reply.to_string(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl CompletionProvider for FlakyProvider {
        fn label(&self) -> &str {
            "flaky"
        }

        async fn complete(&self, _prompt: &str) -> anyhow::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut left = self.failures_left.lock().unwrap();
            if *left > 0 {
                *left -= 1;
                anyhow::bail!("temporary failure");
            }
            Ok(self.reply.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{BrokenProvider, FlakyProvider, StaticProvider};
    use super::*;

    fn engine(providers: Vec<Arc<dyn CompletionProvider>>) -> TranslationEngine {
        TranslationEngine::new(providers).unwrap()
    }

    #[tokio::test]
    async fn translates_and_resolves_auto() {
        let provider = Arc::new(StaticProvider::new("static", "Translation: \"Привет мир\""));
        let engine = engine(vec![provider.clone()]);

        let outcome = engine
            .translate("Hello world", Language::Auto, Language::Russian)
            .await
            .unwrap();
        assert_eq!(outcome.translation, "Привет мир");
        assert_eq!(outcome.detected, Language::English);
        assert!(!outcome.from_cache);
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn phrase_cache_skips_providers() {
        let provider = Arc::new(StaticProvider::new("static", "Hallo Welt"));
        let engine = engine(vec![provider.clone()]);

        engine
            .translate("Hello world", Language::English, Language::German)
            .await
            .unwrap();
        let second = engine
            .translate("  hello WORLD  ", Language::English, Language::German)
            .await
            .unwrap();
        assert!(second.from_cache);
        assert_eq!(second.translation, "Hallo Welt");
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn word_cache_rebuilds_reordered_text() {
        let provider = Arc::new(StaticProvider::new("static", "привет мир"));
        let engine = engine(vec![provider.clone()]);

        engine
            .translate("hello world", Language::English, Language::Russian)
            .await
            .unwrap();
        let rebuilt = engine
            .translate("world hello", Language::English, Language::Russian)
            .await
            .unwrap();
        assert!(rebuilt.from_cache);
        assert_eq!(rebuilt.translation, "мир привет");
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn race_survives_a_broken_provider() {
        let good = Arc::new(StaticProvider::new("good", "Hallo Welt"));
        let engine = engine(vec![Arc::new(BrokenProvider), good.clone()]);

        let outcome = engine
            .translate("Hello world", Language::English, Language::German)
            .await
            .unwrap();
        assert_eq!(outcome.translation, "Hallo Welt");
    }

    #[tokio::test]
    async fn falls_back_to_terse_prompt() {
        let flaky = Arc::new(FlakyProvider::new(1, "Hallo Welt"));
        let engine = engine(vec![flaky.clone()]);

        let outcome = engine
            .translate("Hello world", Language::English, Language::German)
            .await
            .unwrap();
        assert_eq!(outcome.translation, "Hallo Welt");
        // One racing attempt plus the fallback retry.
        assert_eq!(flaky.calls.load(std::sync::atomic::Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn rejects_empty_and_auto_target() {
        let engine = engine(vec![Arc::new(StaticProvider::new("static", "x"))]);
        assert!(engine
            .translate("   ", Language::Auto, Language::Russian)
            .await
            .is_err());
        assert!(engine
            .translate("Hello", Language::Auto, Language::Auto)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn errors_without_providers() {
        let engine = engine(Vec::new());
        assert!(engine
            .translate("Hello", Language::Auto, Language::Russian)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn cache_stats_count_both_caches() {
        let provider = Arc::new(StaticProvider::new("static", "привет мир"));
        let engine = engine(vec![provider]);
        engine
            .translate("hello world", Language::English, Language::Russian)
            .await
            .unwrap();
        let stats = engine.cache_stats();
        assert_eq!(stats.phrases, 1);
        assert_eq!(stats.words, 2);
    }
}
