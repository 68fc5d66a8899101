//! Readiness signal for the backing service.
//!
//! The poller must not start until the service reports that it has finished
//! initializing (its settings are loaded). The signal is a watch channel so
//! late subscribers still observe a readiness that fired earlier.

use tokio::sync::watch;

/// Sending half: marks the service as initialized.
#[derive(Debug)]
pub struct ReadinessNotifier {
    tx: watch::Sender<bool>,
}

impl ReadinessNotifier {
    /// Mark the service initialized. Idempotent.
    pub fn mark_initialized(&self) {
        self.tx.send_replace(true);
    }
}

/// Receiving half: waits for the service to become initialized.
#[derive(Debug, Clone)]
pub struct ReadinessSignal {
    rx: watch::Receiver<bool>,
}

impl ReadinessSignal {
    /// A signal that has already fired.
    pub fn initialized() -> Self {
        let (_tx, rx) = watch::channel(true);
        Self { rx }
    }

    /// Whether the service is initialized right now.
    pub fn is_initialized(&self) -> bool {
        *self.rx.borrow()
    }

    /// Wait until the service is initialized.
    ///
    /// Returns `false` if the notifier was dropped without ever firing.
    pub async fn wait(&mut self) -> bool {
        self.rx.wait_for(|ready| *ready).await.is_ok()
    }
}

/// Create a connected notifier/signal pair in the "not initialized" state.
pub fn readiness_channel() -> (ReadinessNotifier, ReadinessSignal) {
    let (tx, rx) = watch::channel(false);
    (ReadinessNotifier { tx }, ReadinessSignal { rx })
}
