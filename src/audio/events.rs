//! Typed publish/subscribe for engine state changes.
//!
//! Subscribers register a callback for one [`EventKind`]. Handlers run on the
//! emitting task, outside the registry lock, and a panicking handler is
//! logged and skipped so the remaining subscribers still run.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{error, trace};

use crate::error::PlaybackError;
use crate::library::Track;

use super::types::{PlaybackState, Progress};

/// Transport commands that originate outside the app (media keys, lock
/// screen, headset buttons) or that the engine reports to those surfaces.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RemoteCommand {
    Play,
    Pause,
    Stop,
    Next,
    Previous,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    /// Playback state or progress changed.
    StateChanged {
        state: PlaybackState,
        progress: Progress,
    },
    /// A new track was bound to the live media handle.
    ActiveTrackChanged { index: usize, track: Track },
    /// A track could not be played.
    Error(PlaybackError),
    Remote(RemoteCommand),
    /// The last track finished with repeat off.
    QueueEnded { index: usize },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    StateChanged,
    ActiveTrackChanged,
    Error,
    Remote,
    QueueEnded,
}

impl PlayerEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::StateChanged { .. } => EventKind::StateChanged,
            Self::ActiveTrackChanged { .. } => EventKind::ActiveTrackChanged,
            Self::Error(_) => EventKind::Error,
            Self::Remote(_) => EventKind::Remote,
            Self::QueueEnded { .. } => EventKind::QueueEnded,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler = Arc<dyn Fn(&PlayerEvent) + Send + Sync>;

struct Subscriber {
    id: SubscriptionId,
    kind: EventKind,
    handler: Handler,
}

#[derive(Default)]
pub struct EventNotifier {
    next_id: AtomicU64,
    subscribers: Mutex<Vec<Subscriber>>,
}

impl EventNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: Fn(&PlayerEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers().push(Subscriber {
            id,
            kind,
            handler: Arc::new(handler),
        });
        id
    }

    /// Remove a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers();
        let before = subscribers.len();
        subscribers.retain(|s| s.id != id);
        subscribers.len() != before
    }

    /// Deliver `event` to every subscriber of its kind and return how many
    /// handlers completed without panicking.
    pub fn emit(&self, event: &PlayerEvent) -> usize {
        let kind = event.kind();
        let handlers: Vec<(SubscriptionId, Handler)> = self
            .subscribers()
            .iter()
            .filter(|s| s.kind == kind)
            .map(|s| (s.id, Arc::clone(&s.handler)))
            .collect();

        trace!(?kind, subscribers = handlers.len(), "emitting event");

        let mut delivered = 0;
        for (id, handler) in handlers {
            match panic::catch_unwind(AssertUnwindSafe(|| handler(event))) {
                Ok(()) => delivered += 1,
                Err(payload) => {
                    error!(
                        subscription = id.0,
                        ?kind,
                        "event handler panicked: {}",
                        panic_message(payload)
                    );
                }
            }
        }
        delivered
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers().len()
    }

    fn subscribers(&self) -> MutexGuard<'_, Vec<Subscriber>> {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        return (*msg).to_string();
    }
    if let Some(msg) = payload.downcast_ref::<String>() {
        return msg.clone();
    }
    "non-string panic payload".to_string()
}
