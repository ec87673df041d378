pub mod error;
pub mod events;
pub mod interface;

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::AbortHandle;
use tracing::debug;

use crate::languages::Language;
use crate::notify::{NotificationKind, NotificationSink};
use error::ValidationError;
use interface::{Clipboard, TranslateRequest, TranslationTransport};

/// The input fields as the front-end currently shows them. The deferred
/// submission timer reads this at fire time, never a snapshot.
#[derive(Debug, Clone)]
pub struct InputState {
    pub text: String,
    pub source: Language,
    pub target: Language,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            text: String::new(),
            source: Language::Auto,
            target: Language::English,
        }
    }
}

/// Result of a language swap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwappedState {
    pub source: Language,
    pub target: Language,
    pub input_text: String,
    pub output_text: String,
}

/// Orchestrates translation requests for a front-end.
///
/// Owns the single in-flight flag, the replaceable deferred-submission
/// timer, and the last successful output. Collaborators (transport,
/// notification sink, clipboard) are injected so the controller can be
/// driven without a live UI or network.
pub struct TranslationController {
    transport: Arc<dyn TranslationTransport>,
    notifier: Arc<dyn NotificationSink>,
    clipboard: Arc<dyn Clipboard>,
    input: RwLock<InputState>,
    last_output: RwLock<String>,
    in_flight: AtomicBool,
    pending: Mutex<Option<AbortHandle>>,
    // Bumped on every schedule/cancel; a timer only fires if its own
    // generation is still current.
    pending_gen: AtomicU64,
    max_input_chars: usize,
    debounce: Duration,
}

impl TranslationController {
    pub fn new(
        transport: Arc<dyn TranslationTransport>,
        notifier: Arc<dyn NotificationSink>,
        clipboard: Arc<dyn Clipboard>,
        max_input_chars: usize,
        debounce: Duration,
    ) -> Arc<Self> {
        Arc::new(Self {
            transport,
            notifier,
            clipboard,
            input: RwLock::new(InputState::default()),
            last_output: RwLock::new(String::new()),
            in_flight: AtomicBool::new(false),
            pending: Mutex::new(None),
            pending_gen: AtomicU64::new(0),
            max_input_chars,
            debounce,
        })
    }

    /// Submit a translation request.
    ///
    /// Cancels any pending deferred submission, validates the text, and
    /// dispatches at most one request. A call while another request is in
    /// flight is a silent no-op.
    pub async fn submit(
        &self,
        text: &str,
        source: Language,
        target: Language,
    ) -> Result<(), ValidationError> {
        self.cancel_pending();
        self.dispatch(text, source, target).await
    }

    async fn dispatch(
        &self,
        text: &str,
        source: Language,
        target: Language,
    ) -> Result<(), ValidationError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            self.notifier.notify(
                NotificationKind::Warning,
                "Nothing to translate",
                "Enter text to translate",
            );
            return Err(ValidationError::EmptyInput);
        }
        if trimmed.chars().count() > self.max_input_chars {
            self.notifier.notify(
                NotificationKind::Error,
                "Text too long",
                &format!("Maximum {} characters", self.max_input_chars),
            );
            return Err(ValidationError::TooLong(self.max_input_chars));
        }

        // The flag is checked and set before the first await point, so two
        // triggers in the same event loop step cannot both dispatch. The
        // guard clears it on every exit path.
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            debug!("submit ignored, request already in flight");
            return Ok(());
        };

        self.notifier.notify(
            NotificationKind::Info,
            "Translating",
            "Contacting translation service",
        );

        let request = TranslateRequest {
            text: trimmed.to_string(),
            source_lang: source,
            target_lang: target,
        };
        match self.transport.translate(request).await {
            Ok(success) => {
                *self.last_output.write().await = success.translation.clone();
                let status = format!(
                    "{} → {}",
                    success.source_language_name, success.target_language_name
                );
                self.notifier
                    .notify(NotificationKind::Success, &status, &success.translation);
            }
            Err(err) => {
                self.notifier
                    .notify(NotificationKind::Error, "Translation failed", err.reason());
            }
        }
        Ok(())
    }

    /// Arm the deferred submission timer, replacing any previous one.
    ///
    /// When the timer fires it reads the input state as it is then, and
    /// submits only if nothing is in flight and the text is non-empty.
    pub fn schedule_deferred_submit(self: &Arc<Self>, delay: Duration) {
        let generation = self.pending_gen.fetch_add(1, Ordering::AcqRel) + 1;
        let controller = Arc::clone(self);
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if controller.pending_gen.load(Ordering::Acquire) != generation {
                return;
            }
            controller.fire_deferred().await;
        });
        if let Ok(mut slot) = self.pending.lock() {
            if let Some(old) = slot.replace(task.abort_handle()) {
                old.abort();
            }
        }
    }

    /// Arm the timer with the configured debounce delay.
    pub fn debounce_submit(self: &Arc<Self>) {
        self.schedule_deferred_submit(self.debounce);
    }

    /// Cancel a pending deferred submission, if any.
    pub fn cancel_pending(&self) {
        self.pending_gen.fetch_add(1, Ordering::AcqRel);
        if let Ok(mut slot) = self.pending.lock() {
            if let Some(handle) = slot.take() {
                handle.abort();
            }
        }
    }

    async fn fire_deferred(&self) {
        if let Ok(mut slot) = self.pending.lock() {
            slot.take();
        }
        if self.in_flight.load(Ordering::Acquire) {
            return;
        }
        let (text, source, target) = {
            let input = self.input.read().await;
            (input.text.clone(), input.source, input.target)
        };
        if text.trim().is_empty() {
            return;
        }
        let _ = self.dispatch(&text, source, target).await;
    }

    /// Swap languages and text fields. Pure: the controller state is not
    /// touched. Applying the result twice restores the original values.
    pub fn swap_languages(
        &self,
        source: Language,
        target: Language,
        input_text: &str,
        output_text: &str,
    ) -> Result<SwappedState, ValidationError> {
        if source.is_auto() {
            return Err(ValidationError::AutoSwapUnsupported);
        }
        Ok(SwappedState {
            source: target,
            target: source,
            input_text: output_text.to_string(),
            output_text: input_text.to_string(),
        })
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub async fn last_output(&self) -> String {
        self.last_output.read().await.clone()
    }

    pub async fn input_snapshot(&self) -> InputState {
        self.input.read().await.clone()
    }

    pub(crate) async fn set_input_text(&self, text: String) {
        self.input.write().await.text = text;
    }

    pub(crate) async fn set_languages(&self, source: Language, target: Language) {
        let mut input = self.input.write().await;
        input.source = source;
        input.target = target;
    }

    fn notifier(&self) -> &dyn NotificationSink {
        self.notifier.as_ref()
    }

    fn clipboard(&self) -> &dyn Clipboard {
        self.clipboard.as_ref()
    }
}

/// Clears the in-flight flag when dropped, so every dispatched request
/// releases it exactly once no matter which path it exits on.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
            .then_some(Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
