//! Track model and the local track sources used by the host.
//!
//! The engine never builds tracks itself; a source hands it ordered lists.
//! `scan` walks a directory of audio files and `load_playlist` reads a TOML
//! track list.

mod model;
mod playlist;
mod scan;

pub use model::{Artist, Rating, Track, TrackPatch};
pub use playlist::{load_playlist, parse_playlist};
pub use scan::scan;
