//! Restart/Update Notifier

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use apphost_domain::constants::HOST_EVENT_CHANNEL_CAPACITY;
use apphost_domain::events::HostEvent;
use semver::Version;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info};

/// Pending-restart flag plus the host event channel
///
/// The flag starts false and, once set, stays set for the life of the
/// process. Every request publishes an event, including repeated ones.
///
/// The general event channel is bounded and drops the oldest events for a
/// slow subscriber. Restart observers registered through
/// [`RestartNotifier::subscribe_restart_requests`] get every request.
pub struct RestartNotifier {
    pending_restart: AtomicBool,
    requests: AtomicU64,
    restart_observers: Mutex<Vec<mpsc::UnboundedSender<u64>>>,
    events: broadcast::Sender<HostEvent>,
}

impl RestartNotifier {
    /// Create a notifier with an empty event channel
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(HOST_EVENT_CHANNEL_CAPACITY);
        Self {
            pending_restart: AtomicBool::new(false),
            requests: AtomicU64::new(0),
            restart_observers: Mutex::new(Vec::new()),
            events,
        }
    }

    /// Subscribe to host events
    pub fn subscribe(&self) -> broadcast::Receiver<HostEvent> {
        self.events.subscribe()
    }

    /// Observe restart requests without loss
    ///
    /// Receives the sequence number of every request made after
    /// subscribing, starting at 1 for the first request of the process.
    pub fn subscribe_restart_requests(&self) -> mpsc::UnboundedReceiver<u64> {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.observers().push(sender);
        receiver
    }

    /// Number of restart requests made so far
    pub fn restart_request_count(&self) -> u64 {
        self.requests.load(Ordering::Acquire)
    }

    /// Publish an event to current subscribers
    pub fn publish(&self, event: HostEvent) {
        let delivered = self.events.send(event).unwrap_or(0);
        debug!(subscribers = delivered, "Host event published");
    }

    /// Whether a restart has been requested
    pub fn has_pending_restart(&self) -> bool {
        self.pending_restart.load(Ordering::Acquire)
    }

    /// Record that a change requires a restart
    pub fn notify_pending_restart(&self) {
        self.pending_restart.store(true, Ordering::Release);
        info!("App needs to be restarted");
        {
            let mut observers = self.observers();
            let request = self.requests.fetch_add(1, Ordering::AcqRel) + 1;
            observers.retain(|observer| observer.send(request).is_ok());
        }
        self.publish(HostEvent::HasPendingRestartChanged);
    }

    /// Record that the application was updated to `version`
    pub fn on_application_updated(&self, version: Version) {
        info!(version = %version, "Application has been updated");
        self.publish(HostEvent::ApplicationUpdated { version });
        self.notify_pending_restart();
    }

    fn observers(&self) -> std::sync::MutexGuard<'_, Vec<mpsc::UnboundedSender<u64>>> {
        self.restart_observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for RestartNotifier {
    fn default() -> Self {
        Self::new()
    }
}
