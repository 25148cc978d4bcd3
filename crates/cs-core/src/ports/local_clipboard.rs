//! Clipboard port - abstracts local clipboard access

use anyhow::Result;

/// Platform-agnostic interface to the system clipboard.
///
/// The OS clipboard is a shared resource with no transactional guarantees;
/// reads are best-effort snapshots and a concurrent local edit may land
/// between a read and a write.
pub trait LocalClipboardPort: Send + Sync {
    /// Read the current clipboard text. An empty string means the clipboard
    /// is empty or holds no text representation.
    fn read_text(&self) -> Result<String>;

    /// Replace the clipboard content with `text`.
    fn write_text(&self, text: &str) -> Result<()>;
}
