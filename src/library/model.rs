use std::time::Duration;

use serde::Deserialize;

/// Who performed a track.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Artist {
    pub name: String,
    pub id: Option<String>,
    pub image: Option<String>,
}

impl Artist {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// The liked flag shown by the favourite toggle.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rating {
    #[default]
    Unrated,
    Liked,
}

impl From<bool> for Rating {
    fn from(liked: bool) -> Self {
        if liked { Self::Liked } else { Self::Unrated }
    }
}

/// One playable audio item.
///
/// Tracks are built by a track source and handed to the engine, which only
/// stores them and patches the fields covered by [`TrackPatch`].
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artist: Artist,
    /// Advisory length; the loaded media reports the real one.
    pub duration: Option<Duration>,
    pub genre: Option<String>,
    /// Local path or `file://` URL. Empty means the track cannot be played.
    pub media_url: String,
    pub thumbnail_url: Option<String>,
    pub rating: Rating,
}

impl Track {
    pub fn new(id: impl Into<String>, title: impl Into<String>, media_url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: Artist::default(),
            duration: None,
            genre: None,
            media_url: media_url.into(),
            thumbnail_url: None,
            rating: Rating::Unrated,
        }
    }

    pub fn with_artist(mut self, artist: Artist) -> Self {
        self.artist = artist;
        self
    }

    pub fn is_playable(&self) -> bool {
        !self.media_url.trim().is_empty()
    }

    /// `Artist - Title`, or just the title when the artist is unknown.
    pub fn display(&self) -> String {
        match self.artist.name.trim() {
            "" => self.title.clone(),
            artist => format!("{} - {}", artist, self.title),
        }
    }
}

/// A partial update for the mutable subset of a queued [`Track`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrackPatch {
    pub title: Option<String>,
    pub artist: Option<Artist>,
    pub genre: Option<String>,
    pub thumbnail_url: Option<String>,
    pub rating: Option<Rating>,
}

impl TrackPatch {
    pub fn rating(rating: Rating) -> Self {
        Self {
            rating: Some(rating),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply_to(&self, track: &mut Track) {
        if let Some(title) = &self.title {
            track.title = title.clone();
        }
        if let Some(artist) = &self.artist {
            track.artist = artist.clone();
        }
        if let Some(genre) = &self.genre {
            track.genre = Some(genre.clone());
        }
        if let Some(url) = &self.thumbnail_url {
            track.thumbnail_url = Some(url.clone());
        }
        if let Some(rating) = self.rating {
            track.rating = rating;
        }
    }
}
