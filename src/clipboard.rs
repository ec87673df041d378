use std::sync::Mutex;

use anyhow::anyhow;
use cli_clipboard::{ClipboardContext, ClipboardProvider};

use crate::controller::interface::Clipboard;

/// System clipboard. A context is created per call because the provider
/// handle is not `Sync`.
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn read_text(&self) -> anyhow::Result<String> {
        let mut ctx =
            ClipboardContext::new().map_err(|e| anyhow!("clipboard unavailable: {}", e))?;
        ctx.get_contents()
            .map_err(|e| anyhow!("clipboard read failed: {}", e))
    }

    fn write_text(&self, text: &str) -> anyhow::Result<()> {
        let mut ctx =
            ClipboardContext::new().map_err(|e| anyhow!("clipboard unavailable: {}", e))?;
        ctx.set_contents(text.to_string())
            .map_err(|e| anyhow!("clipboard write failed: {}", e))
    }
}

/// Process-local clipboard for headless runs and tests.
#[derive(Default)]
pub struct InMemoryClipboard {
    contents: Mutex<String>,
}

impl Clipboard for InMemoryClipboard {
    fn read_text(&self) -> anyhow::Result<String> {
        Ok(self
            .contents
            .lock()
            .map_err(|_| anyhow!("clipboard state poisoned"))?
            .clone())
    }

    fn write_text(&self, text: &str) -> anyhow::Result<()> {
        *self
            .contents
            .lock()
            .map_err(|_| anyhow!("clipboard state poisoned"))? = text.to_string();
        Ok(())
    }
}
