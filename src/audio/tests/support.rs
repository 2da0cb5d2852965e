//! In-memory media backend for engine tests.
//!
//! Loads and unloads can be delayed with `async_io::Timer` so tests can
//! interleave engine calls at the backend's suspension points.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_io::Timer;

use crate::audio::{MediaBackend, MediaHandle, MediaStatus};
use crate::error::MediaError;

pub(super) const TRACK_LENGTH: Duration = Duration::from_secs(180);

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap()
}

#[derive(Debug, Default)]
pub(super) struct FakeMedia {
    pub url: String,
    pub volume: f32,
    pub playing: bool,
    pub position: Duration,
    pub finished: bool,
    pub unloaded: bool,
    pub plays: usize,
}

#[derive(Default)]
struct Shared {
    media: Mutex<Vec<Arc<Mutex<FakeMedia>>>>,
    failing: Mutex<Vec<String>>,
    load_delay: Mutex<Duration>,
    unload_delay: Mutex<Duration>,
    fail_play: AtomicBool,
}

#[derive(Clone, Default)]
pub(super) struct FakeBackend {
    shared: Arc<Shared>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_load_delay(self, delay: Duration) -> Self {
        *lock(&self.shared.load_delay) = delay;
        self
    }

    pub fn with_unload_delay(self, delay: Duration) -> Self {
        *lock(&self.shared.unload_delay) = delay;
        self
    }

    pub fn fail_url(&self, url: &str) {
        lock(&self.shared.failing).push(url.to_string());
    }

    pub fn heal_url(&self, url: &str) {
        lock(&self.shared.failing).retain(|u| u != url);
    }

    pub fn fail_play(&self, fail: bool) {
        self.shared.fail_play.store(fail, Ordering::SeqCst);
    }

    /// Number of handles created so far.
    pub fn loads(&self) -> usize {
        lock(&self.shared.media).len()
    }

    pub fn media(&self, i: usize) -> Arc<Mutex<FakeMedia>> {
        Arc::clone(&lock(&self.shared.media)[i])
    }

    pub fn latest(&self) -> Arc<Mutex<FakeMedia>> {
        let media = lock(&self.shared.media);
        Arc::clone(media.last().expect("no media loaded"))
    }

    pub fn latest_url(&self) -> String {
        self.latest().lock().unwrap().url.clone()
    }

    /// Handles that have not been unloaded.
    pub fn live_count(&self) -> usize {
        lock(&self.shared.media)
            .iter()
            .filter(|m| !m.lock().unwrap().unloaded)
            .count()
    }

    /// Make the newest handle report that it played to its end.
    pub fn finish_latest(&self) {
        let media = self.latest();
        let mut media = media.lock().unwrap();
        media.finished = true;
        media.playing = false;
        media.position = TRACK_LENGTH;
    }
}

impl MediaBackend for FakeBackend {
    type Handle = FakeHandle;

    async fn load(&self, url: &str, volume: f32) -> Result<FakeHandle, MediaError> {
        let delay = *lock(&self.shared.load_delay);
        if !delay.is_zero() {
            Timer::after(delay).await;
        }

        let failing = lock(&self.shared.failing).iter().any(|u| u == url);
        if failing {
            return Err(MediaError::Decode {
                path: PathBuf::from(url),
                reason: "unrecognised container".to_string(),
            });
        }

        let media = Arc::new(Mutex::new(FakeMedia {
            url: url.to_string(),
            volume,
            ..FakeMedia::default()
        }));
        lock(&self.shared.media).push(Arc::clone(&media));
        Ok(FakeHandle {
            media,
            shared: Arc::clone(&self.shared),
        })
    }
}

pub(super) struct FakeHandle {
    media: Arc<Mutex<FakeMedia>>,
    shared: Arc<Shared>,
}

impl FakeHandle {
    fn live(&self) -> Result<MutexGuard<'_, FakeMedia>, MediaError> {
        let media = lock(&self.media);
        if media.unloaded {
            Err(MediaError::Released)
        } else {
            Ok(media)
        }
    }
}

impl MediaHandle for FakeHandle {
    async fn play(&self) -> Result<(), MediaError> {
        if self.shared.fail_play.load(Ordering::SeqCst) {
            return Err(MediaError::Released);
        }
        let mut media = self.live()?;
        media.playing = true;
        media.plays += 1;
        Ok(())
    }

    async fn pause(&self) -> Result<(), MediaError> {
        self.live()?.playing = false;
        Ok(())
    }

    async fn stop(&self) -> Result<(), MediaError> {
        let mut media = self.live()?;
        media.playing = false;
        media.position = Duration::ZERO;
        Ok(())
    }

    async fn seek(&self, position: Duration) -> Result<(), MediaError> {
        self.live()?.position = position;
        Ok(())
    }

    async fn set_volume(&self, volume: f32) -> Result<(), MediaError> {
        self.live()?.volume = volume;
        Ok(())
    }

    async fn unload(&self) -> Result<(), MediaError> {
        let delay = *lock(&self.shared.unload_delay);
        if !delay.is_zero() {
            Timer::after(delay).await;
        }
        let mut media = lock(&self.media);
        media.unloaded = true;
        media.playing = false;
        Ok(())
    }

    fn status(&self) -> MediaStatus {
        let media = lock(&self.media);
        MediaStatus {
            position: media.position,
            duration: Some(TRACK_LENGTH),
            playing: media.playing,
            finished: media.finished,
        }
    }
}
