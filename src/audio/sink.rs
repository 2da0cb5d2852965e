//! `rodio`-backed media for local audio files.
//!
//! Each loaded track gets its own paused `Sink` on the shared output mixer.
//! Seeking uses `Sink::try_seek`, so it works for the formats rodio can seek
//! in (the common ones).

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use lofty::prelude::AudioFile;
use rodio::mixer::Mixer;
use rodio::{Decoder, Sink, Source};
use tracing::trace;

use crate::error::MediaError;

use super::backend::{MediaBackend, MediaHandle, MediaStatus};

pub struct RodioBackend {
    mixer: Mixer,
}

impl RodioBackend {
    /// Create sinks on `mixer`. The caller keeps the `OutputStream` that owns
    /// the mixer alive for as long as the backend is in use.
    pub fn new(mixer: Mixer) -> Self {
        Self { mixer }
    }
}

impl MediaBackend for RodioBackend {
    type Handle = RodioHandle;

    async fn load(&self, url: &str, volume: f32) -> Result<RodioHandle, MediaError> {
        let path = local_path(url)?;
        let file = File::open(&path).map_err(|source| MediaError::Open {
            path: path.clone(),
            source,
        })?;

        let decoder = Decoder::new(BufReader::new(file)).map_err(|e| MediaError::Decode {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        let duration = decoder.total_duration().or_else(|| probe_duration(&path));
        trace!(?path, ?duration, "opened sink");

        let sink = Sink::connect_new(&self.mixer);
        sink.pause();
        sink.set_volume(volume);
        sink.append(decoder);

        Ok(RodioHandle { sink, duration })
    }
}

pub struct RodioHandle {
    sink: Sink,
    duration: Option<Duration>,
}

impl MediaHandle for RodioHandle {
    async fn play(&self) -> Result<(), MediaError> {
        self.sink.play();
        Ok(())
    }

    async fn pause(&self) -> Result<(), MediaError> {
        self.sink.pause();
        Ok(())
    }

    async fn stop(&self) -> Result<(), MediaError> {
        // `Sink::stop` drops the queued source; rewind instead so the track
        // can be played again.
        self.sink.pause();
        self.sink
            .try_seek(Duration::ZERO)
            .map_err(|e| MediaError::Seek(e.to_string()))
    }

    async fn seek(&self, position: Duration) -> Result<(), MediaError> {
        self.sink
            .try_seek(position)
            .map_err(|e| MediaError::Seek(e.to_string()))
    }

    async fn set_volume(&self, volume: f32) -> Result<(), MediaError> {
        self.sink.set_volume(volume);
        Ok(())
    }

    async fn unload(&self) -> Result<(), MediaError> {
        self.sink.stop();
        Ok(())
    }

    fn status(&self) -> MediaStatus {
        let finished = self.sink.empty();
        MediaStatus {
            position: self.sink.get_pos(),
            duration: self.duration,
            playing: !finished && !self.sink.is_paused(),
            finished,
        }
    }
}

/// Map a track URL to a local file path.
fn local_path(url: &str) -> Result<PathBuf, MediaError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(MediaError::UnsupportedUrl(String::new()));
    }
    if let Some(rest) = url.strip_prefix("file://") {
        return Ok(PathBuf::from(rest));
    }
    if url.contains("://") {
        return Err(MediaError::UnsupportedUrl(url.to_string()));
    }
    Ok(PathBuf::from(url))
}

/// Fall back to the container metadata when the decoder cannot tell.
fn probe_duration(path: &Path) -> Option<Duration> {
    lofty::read_from_path(path)
        .ok()
        .map(|tagged| tagged.properties().duration())
        .filter(|d| !d.is_zero())
}
