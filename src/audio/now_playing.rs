use crate::library::Track;

use super::types::Progress;

/// OS-level "now playing" surface (lock screen, media overlay, MPRIS).
///
/// The engine calls this on track changes and transport transitions. Calls
/// are fire-and-forget; implementations must not block.
pub trait NowPlaying: Send + Sync {
    fn update_playback_state(&self, track: Option<&Track>, playing: bool, progress: Progress);
}
