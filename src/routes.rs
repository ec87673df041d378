use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use crate::languages::{Language, ALL_LANGUAGES};
use crate::state::AppState;

pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/translate", post(translate_text))
        .route("/languages", get(get_languages))
        .route("/api/health", get(health_check))
}

#[derive(Debug, Deserialize)]
struct TranslateBody {
    #[serde(default)]
    text: String,
    #[serde(default)]
    source_lang: Option<String>,
    #[serde(default)]
    target_lang: Option<String>,
}

fn failure(error: &str) -> Json<Value> {
    Json(json!({
        "success": false,
        "error": error
    }))
}

async fn translate_text(
    State(state): State<AppState>,
    Json(body): Json<TranslateBody>,
) -> Json<Value> {
    let text = body.text.trim();
    if text.is_empty() {
        return failure("Empty text");
    }
    let max_chars = state.config.translator_config.max_input_chars;
    if text.chars().count() > max_chars {
        return failure(&format!("Text too long (maximum {} characters)", max_chars));
    }

    let source_code = body.source_lang.as_deref().unwrap_or("auto");
    let Some(source) = Language::from_code(source_code) else {
        return failure(&format!("Unknown source language: {}", source_code));
    };
    let target_code = body.target_lang.as_deref().unwrap_or("en");
    let Some(target) = Language::from_code(target_code) else {
        return failure(&format!("Unknown target language: {}", target_code));
    };
    if target.is_auto() {
        return failure("Target language cannot be auto");
    }

    match state.engine.translate(text, source, target).await {
        Ok(outcome) => Json(json!({
            "success": true,
            "translation": outcome.translation,
            "detected_language": outcome.detected.code(),
            "source_language_name": outcome.detected.display_name(),
            "target_language_name": target.display_name(),
        })),
        Err(err) => {
            warn!("translation failed: {}", err);
            failure(&err.to_string())
        }
    }
}

async fn get_languages(State(_state): State<AppState>) -> Json<Value> {
    let mut languages = serde_json::Map::new();
    for lang in ALL_LANGUAGES {
        languages.insert(lang.code().to_string(), json!(lang.display_name()));
    }
    Json(Value::Object(languages))
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let stats = state.engine.cache_stats();
    Json(json!({
        "status": "healthy",
        "phrase_cache_size": stats.phrases,
        "word_cache_size": stats.words,
        "supported_languages": ALL_LANGUAGES.len(),
        "uptime_secs": state.uptime_secs(),
    }))
}
