pub mod system_clipboard;

pub use system_clipboard::SystemClipboard;
