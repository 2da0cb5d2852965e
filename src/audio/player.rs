use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::{debug, warn};

use crate::config::EngineSettings;
use crate::error::EngineError;
use crate::library::Track;

use super::backend::MediaBackend;
use super::events::{EventKind, EventNotifier, PlayerEvent, SubscriptionId};
use super::guard::{SelectionGate, SingleFlight};
use super::now_playing::NowPlaying;
use super::queue::{Queue, rotate_from, rotated_position};
use super::types::{PlaybackHandle, PlaybackInfo, PlaybackState, PlayerOptions, Progress, RepeatMode};

/// Everything the engine mutates, kept behind one lock.
pub(super) struct Session<H> {
    pub(super) queue: Queue,
    /// The track bound to `media`.
    pub(super) current: Option<Track>,
    pub(super) media: Option<Arc<H>>,
    /// Bumped whenever the queue or the live media is replaced. Work that
    /// suspended with an older value must not commit its result.
    pub(super) generation: u64,
    pub(super) state: PlaybackState,
    pub(super) progress: Progress,
    pub(super) volume: f32,
    pub(super) repeat: RepeatMode,
    /// Natural completion of the current media was already acted on.
    pub(super) finish_handled: bool,
}

impl<H> Session<H> {
    fn new(volume: f32, repeat: RepeatMode) -> Self {
        Self {
            queue: Queue::default(),
            current: None,
            media: None,
            generation: 0,
            state: PlaybackState::Idle,
            progress: Progress::default(),
            volume,
            repeat,
            finish_handled: false,
        }
    }

    /// The live handle with the generation it belongs to.
    pub(super) fn live(&self) -> Option<(Arc<H>, u64)> {
        self.media
            .as_ref()
            .map(|media| (Arc::clone(media), self.generation))
    }

    /// Forget the live media and return it for unloading.
    pub(super) fn detach_media(&mut self) -> Option<Arc<H>> {
        self.generation += 1;
        self.current = None;
        self.state = PlaybackState::Idle;
        self.progress = Progress::default();
        self.finish_handled = false;
        self.media.take()
    }

    fn info(&self) -> PlaybackInfo {
        PlaybackInfo {
            index: (!self.queue.is_empty()).then(|| self.queue.index()),
            track: self.current.clone(),
            state: self.state,
            progress: self.progress,
            can_skip_next: self.queue.can_skip_next(),
            can_skip_previous: self.queue.can_skip_previous(),
        }
    }
}

/// The playback engine.
///
/// One instance owns the queue, the single live media handle and the
/// playback state. Construct it once and hand it (usually in an `Arc`) to
/// whatever issues commands. All methods take `&self`; mutating methods are
/// `async` because they may wait on the media backend.
pub struct AudioPlayer<B: MediaBackend> {
    pub(super) backend: B,
    session: Mutex<Session<B::Handle>>,
    events: EventNotifier,
    playback: PlaybackHandle,
    now_playing: Option<Arc<dyn NowPlaying>>,
    reset_flight: SingleFlight,
    add_flight: SingleFlight,
    selection: SelectionGate,
}

impl<B: MediaBackend> AudioPlayer<B> {
    pub fn new(backend: B, settings: &EngineSettings) -> Self {
        Self {
            backend,
            session: Mutex::new(Session::new(
                super::transport::clamp_volume(settings.volume),
                settings.repeat_mode,
            )),
            events: EventNotifier::new(),
            playback: PlaybackHandle::default(),
            now_playing: None,
            reset_flight: SingleFlight::new(),
            add_flight: SingleFlight::new(),
            selection: SelectionGate::new(Duration::from_millis(settings.select_debounce_ms)),
        }
    }

    /// Report track and transport changes to an OS-level now-playing surface.
    pub fn with_now_playing(mut self, now_playing: Arc<dyn NowPlaying>) -> Self {
        self.now_playing = Some(now_playing);
        self
    }

    pub(super) fn session(&self) -> MutexGuard<'_, Session<B::Handle>> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(super) fn emit(&self, event: PlayerEvent) {
        self.events.emit(&event);
    }

    /// Refresh the shared snapshot read by polling UIs.
    pub(super) fn publish(&self) {
        let info = self.session().info();
        *self.playback.lock().unwrap_or_else(PoisonError::into_inner) = info;
    }

    pub(super) fn notify_now_playing(&self) {
        let Some(now_playing) = &self.now_playing else {
            return;
        };
        let (track, playing, progress) = {
            let session = self.session();
            (session.current.clone(), session.state.is_playing(), session.progress)
        };
        now_playing.update_playback_state(track.as_ref(), playing, progress);
    }

    /// Accepts host options during startup. Always succeeds.
    pub fn setup_player(&self, options: PlayerOptions) -> Result<(), EngineError> {
        debug!(keys = ?options.keys().collect::<Vec<_>>(), "player setup");
        Ok(())
    }

    /// Accepts updated host options. Always succeeds.
    pub fn update_options(&self, options: PlayerOptions) -> Result<(), EngineError> {
        debug!(keys = ?options.keys().collect::<Vec<_>>(), "player options updated");
        Ok(())
    }

    /// Replace the queue and load (without playing) its first track.
    pub async fn set_queue(&self, tracks: Vec<Track>) {
        let (previous, has_tracks) = {
            let mut session = self.session();
            let previous = session.detach_media();
            session.queue.replace(tracks);
            debug!(len = session.queue.len(), "queue replaced");
            (previous, !session.queue.is_empty())
        };
        if let Some(previous) = previous {
            self.release(previous).await;
        }
        self.publish();
        if has_tracks {
            self.jump(0).await;
        }
    }

    /// Append tracks to the tail of the queue.
    ///
    /// When the queue was empty and nothing is loaded, the first new track
    /// becomes current and is loaded. A call that arrives while another
    /// `add` is still in flight is dropped.
    pub async fn add(&self, tracks: impl IntoIterator<Item = Track>) {
        let Some(_flight) = self.add_flight.try_enter() else {
            warn!("add already in progress; dropping request");
            return;
        };

        let load_first = {
            let mut session = self.session();
            let was_empty = session.queue.is_empty();
            let added = session.queue.extend(tracks);
            debug!(added, len = session.queue.len(), "tracks appended");
            was_empty && added > 0 && session.media.is_none()
        };
        self.publish();

        if load_first {
            self.jump(0).await;
        }
    }

    /// Remove the track at `index`.
    ///
    /// Removing the last remaining track also releases the live media.
    pub async fn remove(&self, index: usize) -> Result<(), EngineError> {
        let released = {
            let mut session = self.session();
            let len = session.queue.len();
            let Some(removed) = session.queue.remove(index) else {
                return Err(EngineError::IndexOutOfRange { index, len });
            };
            debug!(index, track = %removed.id, "removed from queue");
            if session.queue.is_empty() {
                session.detach_media()
            } else {
                None
            }
        };
        if let Some(media) = released {
            self.release(media).await;
        }
        self.publish();
        Ok(())
    }

    /// Unload the media and clear the queue.
    ///
    /// Concurrent resets collapse into the one already running.
    pub async fn reset(&self) {
        let Some(_flight) = self.reset_flight.try_enter() else {
            debug!("reset already in flight; dropping request");
            return;
        };
        self.clear_session().await;
    }

    pub(super) async fn clear_session(&self) {
        let previous = {
            let mut session = self.session();
            let previous = session.detach_media();
            session.queue.clear();
            previous
        };
        if let Some(previous) = previous {
            self.release(previous).await;
        }
        self.publish();
        self.emit(PlayerEvent::StateChanged {
            state: PlaybackState::Idle,
            progress: Progress::default(),
        });
        self.notify_now_playing();
    }

    /// Jump to `index` and load it. Does not start playback.
    pub async fn skip(&self, index: usize) -> Result<(), EngineError> {
        let len = self.session().queue.len();
        if index >= len {
            return Err(EngineError::IndexOutOfRange { index, len });
        }
        self.jump(index).await;
        Ok(())
    }

    /// Move the cursor and load the track there. Returns whether it loaded.
    pub(super) async fn jump(&self, index: usize) -> bool {
        if !self.session().queue.set_index(index) {
            return false;
        }
        self.load_track(index).await
    }

    pub async fn skip_to_next(&self) {
        self.step(1).await;
    }

    pub async fn skip_to_previous(&self) {
        self.step(-1).await;
    }

    /// Move one position forward or back, resuming playback if it was playing.
    async fn step(&self, direction: isize) {
        let (target, was_playing) = {
            let session = self.session();
            let target = match direction {
                1 if session.queue.can_skip_next() => Some(session.queue.index() + 1),
                -1 if session.queue.can_skip_previous() => Some(session.queue.index() - 1),
                _ => None,
            };
            (target, session.state.is_playing())
        };
        let Some(target) = target else {
            debug!(direction, "no track to skip to");
            return;
        };
        if self.jump(target).await && was_playing {
            self.play().await;
        }
    }

    pub fn can_skip_to_next(&self) -> bool {
        self.session().queue.can_skip_next()
    }

    pub fn can_skip_to_previous(&self) -> bool {
        self.session().queue.can_skip_previous()
    }

    /// Shuffle the queue, keeping the current track first.
    pub fn shuffle_queue(&self) {
        {
            let mut session = self.session();
            session.queue.shuffle_pinned();
            debug!(len = session.queue.len(), "queue shuffled");
        }
        self.publish();
    }

    /// Optionally shuffle, then jump to `index` and play.
    pub async fn play_from_queue(&self, index: usize, shuffle: bool) -> Result<(), EngineError> {
        let len = self.session().queue.len();
        if index >= len {
            return Err(EngineError::IndexOutOfRange { index, len });
        }
        if shuffle {
            self.shuffle_queue();
        }
        if self.jump(index).await {
            self.play().await;
        }
        Ok(())
    }

    /// Play `list[selected]` on behalf of the visual list called `source`.
    ///
    /// If `source` is not the list the queue was built from, the queue is
    /// rebuilt as the rotation of `list` starting at the selection. If it is,
    /// the engine jumps within the existing rotation instead.
    ///
    /// Returns `Ok(false)` when the request was ignored because another
    /// selection is still being processed or arrived too recently.
    pub async fn select_track(
        &self,
        source: &str,
        list: &[Track],
        selected: usize,
    ) -> Result<bool, EngineError> {
        if selected >= list.len() {
            return Err(EngineError::IndexOutOfRange {
                index: selected,
                len: list.len(),
            });
        }
        let Some(_ticket) = self.selection.try_begin() else {
            debug!(source, selected, "selection ignored");
            return Ok(false);
        };

        // a queue edited since activation no longer mirrors the list
        let offset = {
            let session = self.session();
            (session.queue.is_active_source(source) && session.queue.len() == list.len())
                .then(|| session.queue.offset())
        };

        let loaded = match offset {
            Some(offset) => {
                let index = rotated_position(selected, offset, list.len());
                debug!(source, selected, index, "selection within active queue");
                self.jump(index).await
            }
            None => {
                debug!(source, selected, "activating queue from new source");
                self.clear_session().await;
                self.session()
                    .queue
                    .activate(source, rotate_from(list, selected), selected);
                self.publish();
                self.jump(0).await
            }
        };
        if loaded {
            self.play().await;
        }
        Ok(true)
    }

    pub fn active_track_index(&self) -> Option<usize> {
        let session = self.session();
        (!session.queue.is_empty()).then(|| session.queue.index())
    }

    pub fn queue(&self) -> Vec<Track> {
        self.session().queue.tracks().to_vec()
    }

    pub fn active_track(&self) -> Option<Track> {
        self.session().current.clone()
    }

    pub fn progress(&self) -> Progress {
        self.session().progress
    }

    pub fn is_playing(&self) -> bool {
        self.session().state.is_playing()
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.session().state
    }

    pub fn repeat_mode(&self) -> RepeatMode {
        self.session().repeat
    }

    pub fn set_repeat_mode(&self, mode: RepeatMode) {
        self.session().repeat = mode;
        debug!(?mode, "repeat mode changed");
    }

    /// Shared snapshot kept current on every change.
    pub fn playback_handle(&self) -> PlaybackHandle {
        self.playback.clone()
    }

    pub fn add_event_listener<F>(&self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: Fn(&PlayerEvent) + Send + Sync + 'static,
    {
        self.events.subscribe(kind, handler)
    }

    /// Returns `false` if the listener was already removed.
    pub fn remove_event_listener(&self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }
}
