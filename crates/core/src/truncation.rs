//! Truncation coordinator and the single-slot truncation signal.
//!
//! Every tail subscriber registers its own slot of capacity one. A clear
//! operation empties the log and then tries to fill every slot without
//! blocking; a slot that is already full is left alone. Any number of
//! truncations before a subscriber next checks therefore collapse into a
//! single pending notification.

use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, Mutex};

use crate::error::CoreError;
use crate::log_store::LogStore;

/// Fan-out of single-slot, drop-if-full notifications.
pub struct TruncationSignal {
    slots: Mutex<Vec<mpsc::Sender<()>>>,
}

impl TruncationSignal {
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(Vec::new()),
        }
    }

    /// Register a new listener with an empty slot.
    ///
    /// Slots of dropped listeners are pruned here as well as in
    /// [`notify`](Self::notify), so connect/disconnect churn without any
    /// clear does not grow the hub.
    pub async fn subscribe(&self) -> TruncationListener {
        let (tx, rx) = mpsc::channel(1);
        let mut slots = self.slots.lock().await;
        slots.retain(|tx| !tx.is_closed());
        slots.push(tx);
        TruncationListener { rx }
    }

    /// Fill every empty slot. Never blocks on a listener.
    ///
    /// Slots whose listener has been dropped are pruned. Returns the number
    /// of listeners that received a fresh notification (full slots excluded).
    pub async fn notify(&self) -> usize {
        let mut slots = self.slots.lock().await;
        slots.retain(|tx| !tx.is_closed());

        let mut delivered = 0;
        for tx in slots.iter() {
            match tx.try_send(()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(())) | Err(TrySendError::Closed(())) => {}
            }
        }
        delivered
    }

    /// Number of live listeners.
    pub async fn listener_count(&self) -> usize {
        let mut slots = self.slots.lock().await;
        slots.retain(|tx| !tx.is_closed());
        slots.len()
    }
}

impl Default for TruncationSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving side of one subscriber's slot.
pub struct TruncationListener {
    rx: mpsc::Receiver<()>,
}

impl TruncationListener {
    /// Non-blocking check. Returns `true` and empties the slot if a
    /// truncation was signalled since the last check.
    pub fn try_recv(&mut self) -> bool {
        self.rx.try_recv().is_ok()
    }
}

/// Empties the log store and notifies active tail subscribers.
pub struct TruncationCoordinator {
    store: LogStore,
    signal: TruncationSignal,
}

impl TruncationCoordinator {
    pub fn new(store: LogStore) -> Self {
        Self {
            store,
            signal: TruncationSignal::new(),
        }
    }

    /// Register a tail subscriber.
    pub async fn subscribe(&self) -> TruncationListener {
        self.signal.subscribe().await
    }

    /// Number of live tail subscribers.
    pub async fn subscriber_count(&self) -> usize {
        self.signal.listener_count().await
    }

    /// Truncate the log file and signal every subscriber.
    ///
    /// If the truncation fails no signal is emitted. Returns the number of
    /// subscribers that received a fresh notification.
    pub async fn clear_log(&self) -> Result<usize, CoreError> {
        if let Err(e) = self.store.clear().await {
            tracing::error!(path = %self.store.path().display(), error = %e, "Failed to clear log file");
            return Err(e);
        }
        let notified = self.signal.notify().await;
        tracing::info!(path = %self.store.path().display(), notified, "Log file cleared");
        Ok(notified)
    }
}
