//! System clipboard adapter backed by `clipboard-rs`.

use std::sync::Mutex;

use anyhow::{anyhow, Result};
use clipboard_rs::{Clipboard, ClipboardContext};

use cs_core::ports::LocalClipboardPort;

/// [`LocalClipboardPort`] over the OS clipboard.
///
/// The context is not thread-safe, and both sync loops read through the
/// same adapter, so access goes through a mutex.
pub struct SystemClipboard {
    inner: Mutex<ClipboardContext>,
}

impl SystemClipboard {
    pub fn new() -> Result<Self> {
        let context = ClipboardContext::new()
            .map_err(|e| anyhow!("failed to open system clipboard: {}", e))?;
        Ok(Self {
            inner: Mutex::new(context),
        })
    }
}

impl LocalClipboardPort for SystemClipboard {
    fn read_text(&self) -> Result<String> {
        let ctx = self
            .inner
            .lock()
            .map_err(|_| anyhow!("clipboard lock poisoned"))?;
        // clipboard-rs reports an empty clipboard as an error; the sync
        // loops treat "no text" as an empty value.
        Ok(ctx.get_text().unwrap_or_default())
    }

    fn write_text(&self, text: &str) -> Result<()> {
        let ctx = self
            .inner
            .lock()
            .map_err(|_| anyhow!("clipboard lock poisoned"))?;
        ctx.set_text(text.to_string())
            .map_err(|e| anyhow!("failed to write system clipboard: {}", e))
    }
}
