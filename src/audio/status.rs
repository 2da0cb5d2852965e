//! Playback state machine driven by status ticks.
//!
//! The host calls [`AudioPlayer::tick`] on an interval. Each tick folds the
//! live handle's status into the session and, when the media has just played
//! to its end, applies the repeat policy.

use tracing::debug;

use crate::error::EngineError;
use crate::library::TrackPatch;

use super::backend::{MediaBackend, MediaHandle};
use super::events::{PlayerEvent, RemoteCommand};
use super::player::AudioPlayer;
use super::types::{PlaybackState, RepeatMode};

impl<B: MediaBackend> AudioPlayer<B> {
    /// Poll the live media once and react to what it reports.
    pub async fn tick(&self) {
        let Some((media, ticket)) = self.session().live() else {
            return;
        };
        let status = media.status();

        let (state, progress, finished, index) = {
            let mut session = self.session();
            if session.generation != ticket {
                return;
            }
            session.progress.position = status.position;
            if let Some(duration) = status.duration {
                session.progress.duration = duration;
            }

            let finished = status.finished
                && session.state == PlaybackState::Playing
                && !session.finish_handled;
            if finished {
                session.finish_handled = true;
            } else if session.state == PlaybackState::Playing && !status.playing {
                session.state = PlaybackState::Paused;
            } else if status.playing {
                session.state = PlaybackState::Playing;
            }
            (
                session.state,
                session.progress,
                finished,
                session.queue.index(),
            )
        };

        self.publish();
        self.emit(PlayerEvent::StateChanged { state, progress });

        if finished {
            self.finish_track(index).await;
        }
    }

    /// Natural end of the track at `index`.
    async fn finish_track(&self, index: usize) {
        let (repeat, len) = {
            let session = self.session();
            (session.repeat, session.queue.len())
        };
        if len == 0 {
            return;
        }
        debug!(index, ?repeat, "track finished");

        let next = match repeat {
            RepeatMode::Track => Some(index),
            RepeatMode::Queue => Some((index + 1) % len),
            RepeatMode::Off if index + 1 < len => Some(index + 1),
            RepeatMode::Off => None,
        };

        match next {
            Some(next) => {
                if self.jump(next).await {
                    self.play().await;
                }
            }
            None => {
                self.pause().await;
                self.emit(PlayerEvent::QueueEnded { index });
            }
        }
    }

    /// Patch the queued track at `index` in place.
    ///
    /// When `index` is the active track, the current-track reference gets the
    /// same patch so subscribers and the snapshot see it without a requeue.
    pub fn update_metadata_for_track(&self, index: usize, patch: TrackPatch) -> Result<(), EngineError> {
        {
            let mut guard = self.session();
            let session = &mut *guard;
            let len = session.queue.len();
            let is_active = session.queue.index() == index;
            let Some(track) = session.queue.get_mut(index) else {
                return Err(EngineError::IndexOutOfRange { index, len });
            };
            if patch.is_empty() {
                return Ok(());
            }
            patch.apply_to(track);

            if is_active {
                if let Some(current) = session.current.as_mut().filter(|c| c.id == track.id) {
                    patch.apply_to(current);
                }
            }
        }
        self.publish();
        Ok(())
    }

    /// Handle a command from an OS-level remote control surface.
    pub async fn handle_remote(&self, command: RemoteCommand) {
        debug!(?command, "remote command");
        match command {
            // pause and stop report themselves to remote listeners
            RemoteCommand::Pause => self.pause().await,
            RemoteCommand::Stop => self.stop().await,
            RemoteCommand::Play => {
                self.emit(PlayerEvent::Remote(command));
                self.play().await;
            }
            RemoteCommand::Next => {
                self.emit(PlayerEvent::Remote(command));
                self.skip_to_next().await;
            }
            RemoteCommand::Previous => {
                self.emit(PlayerEvent::Remote(command));
                self.skip_to_previous().await;
            }
        }
    }
}
