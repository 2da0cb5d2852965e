//! The playback engine.
//!
//! [`AudioPlayer`] composes the transport (one live media handle), the play
//! queue, the status-driven state machine and the event notifier. Media is
//! produced by a [`MediaBackend`]; [`RodioBackend`] plays local files.

mod backend;
mod events;
mod guard;
mod now_playing;
mod player;
mod queue;
mod sink;
mod status;
mod transport;
mod types;

pub use backend::{MediaBackend, MediaHandle, MediaStatus};
pub use events::{EventKind, EventNotifier, PlayerEvent, RemoteCommand, SubscriptionId};
pub use now_playing::NowPlaying;
pub use player::AudioPlayer;
pub use sink::{RodioBackend, RodioHandle};
pub use types::{
    PlaybackHandle, PlaybackInfo, PlaybackState, PlayerOptions, Progress, RepeatMode,
};
