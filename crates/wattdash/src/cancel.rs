//! One-shot cooperative cancellation shared between the scheduler loop
//! and the input listener. This is the only state the two activities
//! share.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

/// Write-once cancellation signal.
///
/// Firing is idempotent and carries no payload. Clones observe the same
/// signal.
#[derive(Debug, Clone, Default)]
pub struct Cancel {
    fired: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl Cancel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fire(&self) {
        self.fired.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    pub fn is_fired(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }

    /// Resolve once the signal has fired, immediately if it already
    /// has. The future is created before the flag check so a fire that
    /// lands between the two still wakes us.
    pub async fn wait(&self) {
        let notified = self.notify.notified();
        if self.is_fired() {
            return;
        }
        notified.await;
    }
}
