use std::env;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, mpsc};
use std::time::Duration;

use async_io::block_on;
use rodio::OutputStreamBuilder;
use tracing::warn;

use cadenza::audio::{AudioPlayer, PlayerOptions, RodioBackend};
use cadenza::logging;

mod control;
mod event_loop;
mod now_playing;
mod settings;
mod startup;

use control::ControlCmd;
use now_playing::LogNowPlaying;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, settings_warning) = settings::load_settings();
    logging::init(&settings.logging)?;
    if let Some(msg) = settings_warning {
        warn!("{msg}");
    }

    let target = env::args().nth(1);
    let tracks = startup::load_tracks(target.as_deref(), &settings.library)?;
    if tracks.is_empty() {
        warn!("no tracks found");
        return Ok(());
    }
    startup::print_library(&tracks);

    let mut stream = OutputStreamBuilder::open_default_stream()?;
    // rodio logs to stderr when the stream is dropped
    stream.log_on_drop(false);

    let backend = RodioBackend::new(stream.mixer().clone());
    let player = AudioPlayer::new(backend, &settings.engine).with_now_playing(Arc::new(LogNowPlaying));
    player.setup_player(PlayerOptions::new())?;

    let ended = Arc::new(AtomicBool::new(false));
    startup::install_listeners(&player, Arc::clone(&ended));

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    control::spawn_stdin(control_tx);

    let interval = Duration::from_millis(settings.engine.status_interval_ms);
    block_on(async {
        player.set_queue(tracks.clone()).await;
        player.play().await;
        event_loop::run(&player, &tracks, &control_rx, &ended, interval).await;
        player.reset().await;
    });

    Ok(())
}
