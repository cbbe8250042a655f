//! Shutdown coordination between the server and background tasks.

use tokio::sync::broadcast;

/// Broadcasts a single shutdown notice to every subscribed task.
///
/// The HTTP server drains on it and the rule reloader leaves its loop.
/// Subscribers created after `trigger` miss the notice, so subscribe
/// before spawning.
#[derive(Debug, Clone)]
pub struct Shutdown {
    notice: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (notice, _) = broadcast::channel(1);
        Self { notice }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.notice.subscribe()
    }

    /// Notify all current subscribers. Returns how many were reached.
    pub fn trigger(&self) -> usize {
        self.notice.send(()).unwrap_or(0)
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
