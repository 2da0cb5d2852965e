use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, warn};

use cadenza::audio::{AudioPlayer, EventKind, MediaBackend, PlayerEvent};
use cadenza::config::LibrarySettings;
use cadenza::error::LibraryError;
use cadenza::library::{self, Track};

/// Tracks from a TOML playlist, or from scanning a directory.
///
/// Without a target the current directory is scanned.
pub fn load_tracks(target: Option<&str>, settings: &LibrarySettings) -> Result<Vec<Track>, LibraryError> {
    let path = match target {
        Some(target) => PathBuf::from(target),
        None => env::current_dir().unwrap_or_else(|_| PathBuf::from("Music")),
    };

    if is_playlist(&path) {
        info!(path = %path.display(), "loading playlist");
        library::load_playlist(&path)
    } else {
        info!(dir = %path.display(), "scanning for tracks");
        Ok(library::scan(&path, settings))
    }
}

fn is_playlist(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("toml"))
}

/// Numbered listing used by the select command.
pub fn print_library(tracks: &[Track]) {
    for (i, track) in tracks.iter().enumerate() {
        println!("{:>4}  {}", i + 1, track.display());
    }
}

/// Log engine events and raise `ended` when the queue runs out.
pub fn install_listeners<B: MediaBackend>(player: &AudioPlayer<B>, ended: Arc<AtomicBool>) {
    player.add_event_listener(EventKind::ActiveTrackChanged, |event| {
        if let PlayerEvent::ActiveTrackChanged { index, track } = event {
            debug!(index, track = %track.display(), "active track changed");
        }
    });
    player.add_event_listener(EventKind::Error, |event| {
        if let PlayerEvent::Error(err) = event {
            warn!(error = %err, "playback error");
        }
    });
    player.add_event_listener(EventKind::QueueEnded, move |_| {
        ended.store(true, Ordering::Release);
    });
}
