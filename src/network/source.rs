//! Host connectivity sources
//!
//! A `ConnectivitySource` is the host's connectivity API: a current snapshot
//! plus a change event. Hosts without one pass `None` or `NoConnectivity`.

use super::signal::NetworkSignal;
use crate::utils::error::{QualityError, QualityResult};
use parking_lot::RwLock;
use std::sync::Arc;
use uuid::Uuid;

/// Callback invoked with each new connectivity snapshot
pub type ChangeListener = Arc<dyn Fn(NetworkSignal) + Send + Sync>;

/// Identifies one registered change listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(Uuid);

impl ListenerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ListenerId {
    fn default() -> Self {
        Self::new()
    }
}

/// Host connectivity API
pub trait ConnectivitySource: Send + Sync {
    /// Current connectivity, `None` if the host has nothing to report
    fn snapshot(&self) -> Option<NetworkSignal>;

    /// Register a change listener
    fn add_listener(&self, listener: ChangeListener) -> QualityResult<ListenerId>;

    /// Unregister a listener. Unknown ids are ignored.
    fn remove_listener(&self, id: ListenerId);
}

/// A host without any connectivity API
#[derive(Debug, Default, Clone, Copy)]
pub struct NoConnectivity;

impl ConnectivitySource for NoConnectivity {
    fn snapshot(&self) -> Option<NetworkSignal> {
        None
    }

    fn add_listener(&self, _listener: ChangeListener) -> QualityResult<ListenerId> {
        Err(QualityError::ListenerRegistration(
            "no connectivity change events on this host".to_string(),
        ))
    }

    fn remove_listener(&self, _id: ListenerId) {}
}

/// Connectivity source fed by the host.
///
/// Platform glue calls `publish` from its own network callback; listeners run
/// synchronously on that thread in registration order.
#[derive(Default)]
pub struct SharedConnectivity {
    current: RwLock<Option<NetworkSignal>>,
    listeners: RwLock<Vec<(ListenerId, ChangeListener)>>,
}

impl SharedConnectivity {
    /// Create a source with no snapshot yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source seeded with an initial snapshot
    pub fn with_signal(signal: NetworkSignal) -> Self {
        Self {
            current: RwLock::new(Some(signal)),
            listeners: RwLock::new(Vec::new()),
        }
    }

    /// Store a new snapshot and deliver it to every listener
    pub fn publish(&self, signal: NetworkSignal) {
        *self.current.write() = Some(signal);

        // Listeners may unregister themselves, so dispatch outside the lock
        let listeners: Vec<ChangeListener> = self
            .listeners
            .read()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        tracing::debug!(
            "Connectivity changed, notifying {} listener(s): {:?}",
            listeners.len(),
            signal
        );

        for listener in listeners {
            listener(signal);
        }
    }

    /// Forget the current snapshot
    pub fn clear(&self) {
        *self.current.write() = None;
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }
}

impl ConnectivitySource for SharedConnectivity {
    fn snapshot(&self) -> Option<NetworkSignal> {
        *self.current.read()
    }

    fn add_listener(&self, listener: ChangeListener) -> QualityResult<ListenerId> {
        let id = ListenerId::new();
        self.listeners.write().push((id, listener));
        Ok(id)
    }

    fn remove_listener(&self, id: ListenerId) {
        self.listeners.write().retain(|(existing, _)| *existing != id);
    }
}
