use tracing::info;

use cadenza::audio::{NowPlaying, Progress};
use cadenza::library::Track;

/// Reports now-playing changes to the log in place of a desktop media surface.
pub struct LogNowPlaying;

impl NowPlaying for LogNowPlaying {
    fn update_playback_state(&self, track: Option<&Track>, playing: bool, progress: Progress) {
        match track {
            Some(track) => info!(
                track = %track.display(),
                playing,
                position = progress.position.as_secs(),
                length = progress.duration.as_secs(),
                "now playing"
            ),
            None => info!("nothing playing"),
        }
    }
}
