use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// The single persistent status line.
///
/// Each message overwrites the previous one. There is no queue and nothing
/// expires on its own.
#[derive(Clone, Debug)]
pub struct Notifier {
    tx: Arc<watch::Sender<String>>,
}

impl Notifier {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(String::new());
        Self { tx: Arc::new(tx) }
    }

    pub fn set_message(&self, text: impl Into<String>) {
        let text = text.into();
        debug!(text = %text, "status line updated");
        self.tx.send_replace(text);
    }

    pub fn message(&self) -> String {
        self.tx.borrow().clone()
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}
