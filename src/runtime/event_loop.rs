use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Receiver;
use std::time::Duration;

use async_io::Timer;
use tracing::info;

use cadenza::audio::{AudioPlayer, MediaBackend, PlaybackState};
use cadenza::library::{Rating, Track, TrackPatch};

use super::control::ControlCmd;

const VOLUME_STEP: f32 = 0.1;

/// Source name under which library selections are queued.
const LIBRARY_SOURCE: &str = "library";

/// Apply pending commands, then tick the engine every `interval`.
/// Returns when a quit is requested or the queue has played out.
pub async fn run<B: MediaBackend>(
    player: &AudioPlayer<B>,
    library: &[Track],
    control_rx: &Receiver<ControlCmd>,
    ended: &AtomicBool,
    interval: Duration,
) {
    loop {
        while let Ok(cmd) = control_rx.try_recv() {
            if cmd == ControlCmd::Quit {
                info!("quit requested");
                return;
            }
            apply(player, library, cmd).await;
        }

        if ended.load(Ordering::Acquire) {
            info!("queue finished");
            return;
        }

        Timer::after(interval).await;
        player.tick().await;
    }
}

async fn apply<B: MediaBackend>(player: &AudioPlayer<B>, library: &[Track], cmd: ControlCmd) {
    match cmd {
        ControlCmd::Quit => {}
        ControlCmd::PlayPause => match player.playback_state() {
            PlaybackState::Playing => player.pause().await,
            _ => player.play().await,
        },
        ControlCmd::Stop => player.stop().await,
        ControlCmd::Next => player.skip_to_next().await,
        ControlCmd::Prev => player.skip_to_previous().await,
        ControlCmd::VolumeUp => player.set_volume(player.volume() + VOLUME_STEP).await,
        ControlCmd::VolumeDown => player.set_volume(player.volume() - VOLUME_STEP).await,
        ControlCmd::CycleRepeat => {
            let mode = player.repeat_mode().cycle();
            player.set_repeat_mode(mode);
            info!(?mode, "repeat mode");
        }
        ControlCmd::Shuffle => player.shuffle_queue(),
        ControlCmd::ToggleLike => {
            let (Some(index), Some(track)) = (player.active_track_index(), player.active_track()) else {
                return;
            };
            let liked = track.rating != Rating::Liked;
            let patch = TrackPatch::rating(Rating::from(liked));
            match player.update_metadata_for_track(index, patch) {
                Ok(()) => info!(track = %track.display(), liked, "rating changed"),
                Err(e) => info!(error = %e, "nothing to rate"),
            }
        }
        ControlCmd::Seek(position) => player.seek_to(position).await,
        ControlCmd::Select(index) => match player.select_track(LIBRARY_SOURCE, library, index).await {
            Ok(true) => {}
            Ok(false) => info!(index, "selection ignored"),
            Err(e) => info!(error = %e, "nothing to select"),
        },
    }
}
