//! Audio-related small types and handles.
//!
//! This module defines the value types shared by the engine and its
//! consumers: repeat policy, playback state, progress and the polled
//! playback snapshot.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Deserialize;

use crate::library::Track;

/// What happens when the current track plays to its end.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepeatMode {
    /// Advance through the queue and stop after the last track.
    #[default]
    #[serde(alias = "no-loop", alias = "no_loop", alias = "none")]
    Off,
    /// Replay the current track.
    #[serde(alias = "repeat-one", alias = "loop-one", alias = "loop_one", alias = "one")]
    Track,
    /// Advance through the queue and wrap around to the start.
    #[serde(alias = "repeat-all", alias = "loop-all", alias = "loop_all", alias = "all")]
    Queue,
}

impl RepeatMode {
    /// Cycle `Off -> Queue -> Track -> Off`.
    pub fn cycle(self) -> Self {
        match self {
            Self::Off => Self::Queue,
            Self::Queue => Self::Track,
            Self::Track => Self::Off,
        }
    }
}

/// Where the engine is in its playback lifecycle.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum PlaybackState {
    /// Nothing is loaded.
    #[default]
    Idle,
    /// A track is loaded and has not been started yet.
    Ready,
    Playing,
    Paused,
    /// Halted by `stop`; the media stays loaded.
    Stopped,
}

impl PlaybackState {
    pub fn is_playing(self) -> bool {
        self == Self::Playing
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Progress {
    pub position: Duration,
    pub duration: Duration,
}

/// Snapshot of the engine published for UIs that poll instead of subscribing.
#[derive(Debug, Clone, Default)]
pub struct PlaybackInfo {
    /// Queue position of the active track (if the queue is non-empty).
    pub index: Option<usize>,
    /// The track currently bound to the live media handle.
    pub track: Option<Track>,
    pub state: PlaybackState,
    pub progress: Progress,
    pub can_skip_next: bool,
    pub can_skip_previous: bool,
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;

/// Free-form options accepted by `setup_player` / `update_options`.
pub type PlayerOptions = toml::Table;
