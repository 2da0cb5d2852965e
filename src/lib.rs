//! Queue-driven audio playback engine.
//!
//! The engine lives in [`audio`]: an [`audio::AudioPlayer`] owns the play
//! queue, the single live media handle and the playback state machine, and
//! fans state changes out to subscribers. Track lists come from outside the
//! engine; [`library`] provides the local directory and playlist sources used
//! by the bundled host binary.

pub mod audio;
pub mod config;
pub mod error;
pub mod library;
pub mod logging;

pub use audio::{AudioPlayer, PlayerEvent, RepeatMode};
pub use error::{EngineError, MediaError, PlaybackError};
pub use library::{Track, TrackPatch};
