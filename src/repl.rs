use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::error;

use crate::clipboard::SystemClipboard;
use crate::controller::events::UiEvent;
use crate::controller::TranslationController;
use crate::languages::{Language, ALL_LANGUAGES};
use crate::notify::{ChannelNotificationSink, Notification, NotificationKind};
use crate::state::AppState;
use crate::translation_service::TranslationServiceClient;

/// Interactive console client.
///
/// Serves the translation API in-process and drives the controller
/// against it over HTTP, the same path a browser front-end takes.
pub async fn run(state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(format!(
        "{}:{}",
        state.config.system_config.host, state.config.system_config.port
    ))
    .await?;
    let addr = listener.local_addr()?;
    let app = crate::routes::create_routes().with_state(state.clone());
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("embedded server stopped: {}", e);
        }
    });

    let translator_config = &state.config.translator_config;
    let transport = Arc::new(TranslationServiceClient::new(
        format!("http://{}", addr),
        Duration::from_secs(translator_config.request_timeout_secs),
    )?);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let controller = TranslationController::new(
        transport,
        Arc::new(ChannelNotificationSink::new(tx)),
        Arc::new(SystemClipboard),
        translator_config.max_input_chars,
        Duration::from_millis(translator_config.debounce_ms),
    );

    tokio::spawn(async move {
        while let Some(notification) = rx.recv().await {
            print_notification(&notification);
        }
    });

    println!("Translation console on http://{}", addr);
    println!("Type text to translate it, or a command:");
    println!("  :lang <src> <tgt>   pick languages (src may be auto)");
    println!("  :langs              list language codes");
    println!("  :swap (:s)  :clear (:c)  :copy  :paste  :quit");

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        stdout.write_all(b"\n> ").await?;
        stdout.flush().await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }

        if line.starts_with(':') {
            let parts: Vec<&str> = line.split_whitespace().collect();
            match parts.as_slice() {
                [":quit"] | [":q"] => break,
                [":swap"] => controller.handle_event(UiEvent::SwapClicked).await,
                [":s"] => controller.handle_event(UiEvent::SwapShortcut).await,
                [":clear"] => controller.handle_event(UiEvent::ClearClicked).await,
                [":c"] => controller.handle_event(UiEvent::ClearShortcut).await,
                [":copy"] => controller.handle_event(UiEvent::CopyClicked).await,
                [":paste"] => {
                    controller.handle_event(UiEvent::PasteClicked).await;
                    let input = controller.input_snapshot().await;
                    println!("input is now: {}", input.text);
                }
                [":langs"] => {
                    for lang in ALL_LANGUAGES {
                        println!("  {:5} {}", lang.code(), lang.display_name());
                    }
                }
                [":lang", source, target] => match parse_languages(source, target) {
                    Ok((source, target)) => {
                        controller
                            .handle_event(UiEvent::LanguageChanged { source, target })
                            .await;
                        println!("{} -> {}", source.display_name(), target.display_name());
                    }
                    Err(message) => println!("{}", message),
                },
                _ => println!("unknown command: {}", line),
            }
        } else {
            controller
                .handle_event(UiEvent::TextChanged { text: line })
                .await;
            controller.handle_event(UiEvent::SubmitShortcut).await;
        }

        // Give queued notifications a moment to print before the prompt.
        tokio::time::sleep(Duration::from_millis(150)).await;
    }

    Ok(())
}

fn parse_languages(source: &str, target: &str) -> Result<(Language, Language), String> {
    let source = Language::from_code(source)
        .ok_or_else(|| format!("unknown source language: {}", source))?;
    let target = Language::from_code(target)
        .ok_or_else(|| format!("unknown target language: {}", target))?;
    if target.is_auto() {
        return Err("target language cannot be auto".to_string());
    }
    Ok((source, target))
}

fn print_notification(notification: &Notification) {
    let icon = match notification.kind {
        NotificationKind::Success => "✅",
        NotificationKind::Error => "❌",
        NotificationKind::Warning => "⚠️",
        NotificationKind::Info => "ℹ️",
    };
    println!(
        "[{}] {} {}: {}",
        notification.at.format("%H:%M:%S"),
        icon,
        notification.title,
        notification.message
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_language_pairs() {
        let (source, target) = parse_languages("auto", "ru").unwrap();
        assert!(source.is_auto());
        assert_eq!(target, Language::Russian);

        assert!(parse_languages("xx", "ru").is_err());
        assert!(parse_languages("en", "auto").is_err());
    }
}
