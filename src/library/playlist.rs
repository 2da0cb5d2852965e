use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::LibraryError;

use super::model::{Artist, Rating, Track};

#[derive(Debug, Deserialize)]
struct PlaylistFile {
    #[serde(default)]
    tracks: Vec<PlaylistEntry>,
}

#[derive(Debug, Deserialize)]
struct PlaylistEntry {
    id: String,
    title: String,
    #[serde(default)]
    artist: Artist,
    duration_secs: Option<u64>,
    genre: Option<String>,
    #[serde(default)]
    media_url: String,
    thumbnail_url: Option<String>,
    #[serde(default)]
    rating: Rating,
}

impl From<PlaylistEntry> for Track {
    fn from(entry: PlaylistEntry) -> Self {
        Track {
            id: entry.id,
            title: entry.title,
            artist: entry.artist,
            duration: entry.duration_secs.map(Duration::from_secs),
            genre: entry.genre,
            media_url: entry.media_url,
            thumbnail_url: entry.thumbnail_url,
            rating: entry.rating,
        }
    }
}

/// Parse a TOML playlist made of `[[tracks]]` tables.
///
/// Entries without a `media_url` are kept; the engine rejects them when
/// they are loaded.
pub fn parse_playlist(path: &Path, contents: &str) -> Result<Vec<Track>, LibraryError> {
    let file: PlaylistFile = toml::from_str(contents).map_err(|source| LibraryError::Playlist {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(file.tracks.into_iter().map(Track::from).collect())
}

/// Read and parse the playlist at `path`.
pub fn load_playlist(path: &Path) -> Result<Vec<Track>, LibraryError> {
    let contents = std::fs::read_to_string(path).map_err(|source| LibraryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_playlist(path, &contents)
}
