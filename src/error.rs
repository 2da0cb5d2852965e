//! Error types for the playback engine and its collaborators.

use std::path::PathBuf;

use thiserror::Error;

/// Recoverable playback failures, delivered to subscribers through
/// [`PlayerEvent::Error`](crate::audio::PlayerEvent::Error).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    /// The track has an empty or blank media URL.
    #[error("track {track_id} has no audio file")]
    NoAudioFile { track_id: String },

    /// The media backend could not create a handle for the track.
    #[error("failed to load track {track_id}: {reason}")]
    LoadFailure { track_id: String, reason: String },
}

/// Failures reported by a media backend or one of its handles.
#[derive(Error, Debug)]
pub enum MediaError {
    /// Only local paths and `file://` URLs can be opened.
    #[error("unsupported media url: {0}")]
    UnsupportedUrl(String),

    #[error("failed to open {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {path:?}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("seek failed: {0}")]
    Seek(String),

    /// A transport call reached a handle that was already unloaded.
    #[error("media handle was released")]
    Released,
}

/// Caller mistakes rejected at the engine's public API.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("index {index} is out of range for a list of {len} tracks")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Failures while reading a track source.
#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid playlist {path:?}: {source}")]
    Playlist {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Failures while installing the global tracing subscriber.
#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),

    #[error("failed to install tracing subscriber: {0}")]
    Install(String),
}
