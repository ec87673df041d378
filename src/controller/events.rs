use std::sync::Arc;

use tracing::debug;

use super::TranslationController;
use crate::languages::{detect_likely_language, Language};
use crate::notify::NotificationKind;

/// Events supplied by the front-end. The keyboard shortcuts are aliases
/// for the corresponding button events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    TextChanged { text: String },
    LanguageChanged { source: Language, target: Language },
    SubmitClicked,
    ClearClicked,
    SwapClicked,
    CopyClicked,
    PasteClicked,
    SubmitShortcut,
    ClearShortcut,
    SwapShortcut,
    EscapePressed,
}

impl TranslationController {
    pub async fn handle_event(self: &Arc<Self>, event: UiEvent) {
        debug!("ui event: {:?}", event);
        match event {
            UiEvent::TextChanged { text } => self.on_text_changed(text).await,
            UiEvent::LanguageChanged { source, target } => {
                self.on_language_changed(source, target).await
            }
            UiEvent::SubmitClicked | UiEvent::SubmitShortcut => {
                let input = self.input_snapshot().await;
                let _ = self.submit(&input.text, input.source, input.target).await;
            }
            UiEvent::ClearClicked | UiEvent::ClearShortcut => self.on_clear().await,
            UiEvent::SwapClicked | UiEvent::SwapShortcut => self.on_swap().await,
            UiEvent::CopyClicked => self.on_copy().await,
            UiEvent::PasteClicked => self.on_paste().await,
            UiEvent::EscapePressed => {
                // Releases keyboard focus; nothing for the controller to do.
            }
        }
    }

    async fn on_text_changed(self: &Arc<Self>, text: String) {
        self.set_input_text(text.clone()).await;
        let input = self.input_snapshot().await;
        if input.source.is_auto() && !text.trim().is_empty() {
            self.report_detected(&text);
        }
        if !text.trim().is_empty() {
            self.debounce_submit();
        }
    }

    async fn on_language_changed(self: &Arc<Self>, source: Language, target: Language) {
        self.set_languages(source, target).await;
        let input = self.input_snapshot().await;
        if !input.text.trim().is_empty() && !self.is_in_flight() {
            self.debounce_submit();
        }
    }

    async fn on_clear(self: &Arc<Self>) {
        self.cancel_pending();
        self.set_input_text(String::new()).await;
        *self.last_output.write().await = String::new();
        self.notifier()
            .notify(NotificationKind::Success, "Cleared", "Text removed");
    }

    async fn on_swap(self: &Arc<Self>) {
        let input = self.input_snapshot().await;
        let output = self.last_output().await;
        match self.swap_languages(input.source, input.target, &input.text, &output) {
            Ok(swapped) => {
                self.set_languages(swapped.source, swapped.target).await;
                self.set_input_text(swapped.input_text.clone()).await;
                *self.last_output.write().await = swapped.output_text;
                self.notifier().notify(
                    NotificationKind::Success,
                    "Languages swapped",
                    &format!(
                        "{} → {}",
                        swapped.source.display_name(),
                        swapped.target.display_name()
                    ),
                );
                if !swapped.input_text.trim().is_empty() {
                    self.debounce_submit();
                }
            }
            Err(err) => {
                self.notifier()
                    .notify(NotificationKind::Warning, "Cannot swap", &err.to_string());
            }
        }
    }

    async fn on_copy(self: &Arc<Self>) {
        let output = self.last_output().await;
        if output.is_empty() {
            return;
        }
        match self.clipboard().write_text(&output) {
            Ok(()) => self.notifier().notify(
                NotificationKind::Success,
                "Copied",
                "Translation copied to clipboard",
            ),
            Err(err) => self.notifier().notify(
                NotificationKind::Error,
                "Copy failed",
                &err.to_string(),
            ),
        }
    }

    async fn on_paste(self: &Arc<Self>) {
        match self.clipboard().read_text() {
            Ok(text) => {
                self.set_input_text(text.clone()).await;
                let input = self.input_snapshot().await;
                if input.source.is_auto() && !text.trim().is_empty() {
                    self.report_detected(&text);
                }
                self.notifier().notify(
                    NotificationKind::Success,
                    "Pasted",
                    "Text pasted from clipboard",
                );
            }
            Err(err) => self.notifier().notify(
                NotificationKind::Error,
                "Paste failed",
                &err.to_string(),
            ),
        }
    }

    fn report_detected(&self, text: &str) {
        let detected = detect_likely_language(text);
        if detected != Language::English {
            self.notifier().notify(
                NotificationKind::Info,
                "Detected language",
                detected.display_name(),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::super::testing::{sample_success, FakeTransport, RecordingSink};
    use super::super::TranslationController;
    use super::UiEvent;
    use crate::clipboard::InMemoryClipboard;
    use crate::controller::interface::Clipboard;
    use crate::languages::Language;
    use crate::notify::NotificationKind;

    fn build(
        transport: Arc<FakeTransport>,
        sink: Arc<RecordingSink>,
        clipboard: Arc<InMemoryClipboard>,
    ) -> Arc<TranslationController> {
        TranslationController::new(transport, sink, clipboard, 5000, Duration::from_millis(15))
    }

    #[tokio::test]
    async fn text_change_arms_debounce_and_reports_detection() {
        let transport = Arc::new(FakeTransport::succeeding(sample_success()));
        let sink = Arc::new(RecordingSink::default());
        let controller = build(transport.clone(), sink.clone(), Arc::default());

        controller
            .handle_event(UiEvent::TextChanged {
                text: "Привет мир".to_string(),
            })
            .await;

        let detected = sink.last_of(NotificationKind::Info).unwrap();
        assert_eq!(detected.title, "Detected language");
        assert_eq!(detected.message, "Russian");

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn clear_resets_state_and_cancels_timer() {
        let transport = Arc::new(FakeTransport::succeeding(sample_success()));
        let sink = Arc::new(RecordingSink::default());
        let controller = build(transport.clone(), sink.clone(), Arc::default());

        controller
            .handle_event(UiEvent::TextChanged {
                text: "Hello there".to_string(),
            })
            .await;
        controller.handle_event(UiEvent::ClearClicked).await;

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(transport.call_count(), 0);
        assert!(controller.input_snapshot().await.text.is_empty());
        assert!(controller.last_output().await.is_empty());
    }

    #[tokio::test]
    async fn swap_event_applies_swapped_state() {
        let transport = Arc::new(FakeTransport::succeeding(sample_success()));
        let sink = Arc::new(RecordingSink::default());
        let controller = build(transport.clone(), sink.clone(), Arc::default());

        controller
            .handle_event(UiEvent::LanguageChanged {
                source: Language::English,
                target: Language::Russian,
            })
            .await;
        controller.cancel_pending();
        controller
            .submit("Hello", Language::English, Language::Russian)
            .await
            .unwrap();
        controller.set_input_text("Hello".to_string()).await;

        controller.handle_event(UiEvent::SwapClicked).await;
        let input = controller.input_snapshot().await;
        assert_eq!(input.source, Language::Russian);
        assert_eq!(input.target, Language::English);
        assert_eq!(input.text, "Привет");
        assert_eq!(controller.last_output().await, "Hello");
    }

    #[tokio::test]
    async fn swap_event_with_auto_source_warns_and_keeps_state() {
        let transport = Arc::new(FakeTransport::succeeding(sample_success()));
        let sink = Arc::new(RecordingSink::default());
        let controller = build(transport.clone(), sink.clone(), Arc::default());

        controller.set_input_text("Hello".to_string()).await;
        controller.handle_event(UiEvent::SwapClicked).await;

        let warning = sink.last_of(NotificationKind::Warning).unwrap();
        assert_eq!(warning.title, "Cannot swap");
        let input = controller.input_snapshot().await;
        assert_eq!(input.source, Language::Auto);
        assert_eq!(input.target, Language::English);
        assert_eq!(input.text, "Hello");
    }

    #[tokio::test]
    async fn escape_is_inert() {
        let transport = Arc::new(FakeTransport::succeeding(sample_success()));
        let sink = Arc::new(RecordingSink::default());
        let controller = build(transport.clone(), sink.clone(), Arc::default());

        controller.set_input_text("Hello".to_string()).await;
        controller.handle_event(UiEvent::EscapePressed).await;

        assert!(sink.recorded().is_empty());
        assert_eq!(transport.call_count(), 0);
        assert_eq!(controller.input_snapshot().await.text, "Hello");
    }

    #[tokio::test]
    async fn copy_and_paste_round_trip_through_clipboard() {
        let transport = Arc::new(FakeTransport::succeeding(sample_success()));
        let sink = Arc::new(RecordingSink::default());
        let clipboard = Arc::new(InMemoryClipboard::default());
        let controller = build(transport.clone(), sink.clone(), clipboard.clone());

        // Copy with no output yet does nothing.
        controller.handle_event(UiEvent::CopyClicked).await;
        assert!(clipboard.read_text().unwrap().is_empty());

        controller
            .submit("Hello", Language::Auto, Language::Russian)
            .await
            .unwrap();
        controller.handle_event(UiEvent::CopyClicked).await;
        assert_eq!(clipboard.read_text().unwrap(), "Привет");

        controller.handle_event(UiEvent::PasteClicked).await;
        assert_eq!(controller.input_snapshot().await.text, "Привет");
    }
}
