//! Transport: the one live media handle and the primitives that drive it.
//!
//! Failures here never reach the caller. Load failures become
//! [`PlayerEvent::Error`]; play/pause/stop/seek failures are logged and leave
//! the recorded state untouched.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::PlaybackError;

use super::backend::{MediaBackend, MediaHandle};
use super::events::{PlayerEvent, RemoteCommand};
use super::player::AudioPlayer;
use super::types::{PlaybackState, Progress};

/// Clamp into `[0, 1]`; NaN is treated as silence.
pub(super) fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        0.0
    } else {
        volume.clamp(0.0, 1.0)
    }
}

impl<B: MediaBackend> AudioPlayer<B> {
    /// Bind the queued track at `index` to a fresh media handle.
    ///
    /// The previous handle is unloaded first. Returns whether the new handle
    /// was committed; a reset or a newer load that happened while the backend
    /// was working wins, and the late handle is unloaded.
    pub(super) async fn load_track(&self, index: usize) -> bool {
        let (track, ticket, volume, previous) = {
            let mut session = self.session();
            let Some(track) = session.queue.get(index).cloned() else {
                warn!(index, "load requested outside the queue");
                return false;
            };
            if !track.is_playable() {
                drop(session);
                warn!(track = %track.id, "track has no audio file");
                self.emit(PlayerEvent::Error(PlaybackError::NoAudioFile {
                    track_id: track.id,
                }));
                return false;
            }
            let volume = session.volume;
            let previous = session.detach_media();
            (track, session.generation, volume, previous)
        };

        if let Some(previous) = previous {
            self.release(previous).await;
        }

        debug!(index, track = %track.id, url = %track.media_url, "loading track");
        let handle = match self.backend.load(&track.media_url, volume).await {
            Ok(handle) => Arc::new(handle),
            Err(err) => {
                warn!(track = %track.id, error = %err, "failed to load track");
                self.emit(PlayerEvent::Error(PlaybackError::LoadFailure {
                    track_id: track.id,
                    reason: err.to_string(),
                }));
                self.publish();
                return false;
            }
        };

        let committed = {
            let mut session = self.session();
            if session.generation == ticket {
                let duration = handle
                    .status()
                    .duration
                    .or(track.duration)
                    .unwrap_or_default();
                session.media = Some(Arc::clone(&handle));
                session.current = Some(track.clone());
                session.state = PlaybackState::Ready;
                session.progress = Progress {
                    position: Duration::ZERO,
                    duration,
                };
                session.finish_handled = false;
                true
            } else {
                false
            }
        };

        if !committed {
            debug!(track = %track.id, "discarding load superseded while in flight");
            self.release(handle).await;
            return false;
        }

        self.publish();
        self.emit(PlayerEvent::ActiveTrackChanged { index, track });
        self.notify_now_playing();
        true
    }

    pub(super) async fn release(&self, media: Arc<B::Handle>) {
        if let Err(err) = media.unload().await {
            warn!(error = %err, "failed to unload media");
        }
    }

    /// Record `state` if the media that was driven is still the live one.
    fn transition(&self, ticket: u64, state: PlaybackState) -> bool {
        let progress = {
            let mut session = self.session();
            if session.generation != ticket {
                return false;
            }
            session.state = state;
            session.progress
        };
        self.publish();
        self.emit(PlayerEvent::StateChanged { state, progress });
        true
    }

    /// Start or resume playback, loading the current queue entry first when
    /// nothing is loaded yet.
    pub async fn play(&self) {
        let pending = {
            let session = self.session();
            (session.media.is_none() && !session.queue.is_empty()).then(|| session.queue.index())
        };
        if let Some(index) = pending {
            self.load_track(index).await;
        }

        let Some((media, ticket)) = self.session().live() else {
            debug!("play requested with nothing loaded");
            return;
        };
        if let Err(err) = media.play().await {
            warn!(error = %err, "failed to start playback");
            return;
        }
        if self.transition(ticket, PlaybackState::Playing) {
            self.notify_now_playing();
        }
    }

    /// Pause without unloading.
    pub async fn pause(&self) {
        let Some((media, ticket)) = self.session().live() else {
            debug!("pause requested with nothing loaded");
            return;
        };
        if let Err(err) = media.pause().await {
            warn!(error = %err, "failed to pause playback");
            return;
        }
        if self.transition(ticket, PlaybackState::Paused) {
            self.emit(PlayerEvent::Remote(RemoteCommand::Pause));
            self.notify_now_playing();
        }
    }

    /// Halt playback. The media stays loaded.
    pub async fn stop(&self) {
        let Some((media, ticket)) = self.session().live() else {
            debug!("stop requested with nothing loaded");
            return;
        };
        if let Err(err) = media.stop().await {
            warn!(error = %err, "failed to stop playback");
            return;
        }
        if self.transition(ticket, PlaybackState::Stopped) {
            self.emit(PlayerEvent::Remote(RemoteCommand::Stop));
            self.notify_now_playing();
        }
    }

    pub async fn seek_to(&self, position: Duration) {
        let Some((media, ticket)) = self.session().live() else {
            debug!("seek requested with nothing loaded");
            return;
        };
        if let Err(err) = media.seek(position).await {
            warn!(error = %err, ?position, "failed to seek");
            return;
        }
        {
            let mut session = self.session();
            if session.generation != ticket {
                return;
            }
            session.progress.position = position;
        }
        self.publish();
    }

    /// Store the clamped volume and apply it to the live media, if any.
    pub async fn set_volume(&self, volume: f32) {
        let volume = clamp_volume(volume);
        let media = {
            let mut session = self.session();
            session.volume = volume;
            session.media.clone()
        };
        if let Some(media) = media {
            if let Err(err) = media.set_volume(volume).await {
                warn!(error = %err, volume, "failed to apply volume");
            }
        }
    }

    pub fn volume(&self) -> f32 {
        self.session().volume
    }
}
