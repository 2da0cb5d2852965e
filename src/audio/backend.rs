//! The seam between the engine and whatever actually produces sound.
//!
//! Every method that touches media is a suspension point. The engine never
//! holds its own lock across these calls and re-validates its state after
//! each one returns.

use std::future::Future;
use std::time::Duration;

use crate::error::MediaError;

/// Point-in-time status of a media handle, polled by the engine's tick.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct MediaStatus {
    pub position: Duration,
    /// Length reported by the decoder, when known.
    pub duration: Option<Duration>,
    pub playing: bool,
    /// The media reached its natural end.
    pub finished: bool,
}

/// Creates media handles for track URLs.
pub trait MediaBackend: Send + Sync + 'static {
    type Handle: MediaHandle;

    /// Bind a new, paused handle to `url` with `volume` already applied.
    fn load(
        &self,
        url: &str,
        volume: f32,
    ) -> impl Future<Output = Result<Self::Handle, MediaError>> + Send;
}

/// One loaded piece of media.
pub trait MediaHandle: Send + Sync + 'static {
    fn play(&self) -> impl Future<Output = Result<(), MediaError>> + Send;

    fn pause(&self) -> impl Future<Output = Result<(), MediaError>> + Send;

    /// Halt playback without releasing the media.
    fn stop(&self) -> impl Future<Output = Result<(), MediaError>> + Send;

    fn seek(&self, position: Duration) -> impl Future<Output = Result<(), MediaError>> + Send;

    fn set_volume(&self, volume: f32) -> impl Future<Output = Result<(), MediaError>> + Send;

    /// Release the underlying resource. The handle is dead afterwards.
    fn unload(&self) -> impl Future<Output = Result<(), MediaError>> + Send;

    fn status(&self) -> MediaStatus;
}
