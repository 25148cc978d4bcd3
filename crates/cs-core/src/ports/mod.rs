mod local_clipboard;
mod transport;

pub use local_clipboard::LocalClipboardPort;
pub use transport::SyncTransport;
