//! The play queue: an ordered list of tracks plus the cursor into it.
//!
//! When a queue is activated from a visual list, the list is rotated so the
//! chosen track comes first. The rotation `offset` is kept so later picks
//! from the same list can be mapped onto queue positions without requeueing.

use rand::seq::SliceRandom;

use crate::library::Track;

#[derive(Debug, Clone, Default)]
pub(crate) struct Queue {
    tracks: Vec<Track>,
    index: usize,
    /// Position in the source list of the track at queue position 0.
    offset: usize,
    /// Identifier of the visual list this queue was activated from.
    source: Option<String>,
}

impl Queue {
    /// Replace everything with `tracks`, not tied to any source list.
    pub(crate) fn replace(&mut self, tracks: Vec<Track>) {
        *self = Self {
            tracks,
            ..Self::default()
        };
    }

    /// Install an already-rotated list activated from `source`.
    pub(crate) fn activate(&mut self, source: &str, tracks: Vec<Track>, offset: usize) {
        *self = Self {
            tracks,
            index: 0,
            offset,
            source: Some(source.to_string()),
        };
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }

    /// Append to the tail and return how many tracks were added.
    pub(crate) fn extend(&mut self, tracks: impl IntoIterator<Item = Track>) -> usize {
        let before = self.tracks.len();
        self.tracks.extend(tracks);
        self.tracks.len() - before
    }

    /// Remove the track at `index`, pulling the cursor back when the removed
    /// track sat at or before it.
    pub(crate) fn remove(&mut self, index: usize) -> Option<Track> {
        if index >= self.tracks.len() {
            return None;
        }
        let removed = self.tracks.remove(index);
        if index <= self.index {
            self.index = self.index.saturating_sub(1);
        }
        self.index = self.index.min(self.tracks.len().saturating_sub(1));
        Some(removed)
    }

    pub(crate) fn set_index(&mut self, index: usize) -> bool {
        if index < self.tracks.len() {
            self.index = index;
            true
        } else {
            false
        }
    }

    pub(crate) fn index(&self) -> usize {
        self.index
    }

    pub(crate) fn offset(&self) -> usize {
        self.offset
    }

    pub(crate) fn len(&self) -> usize {
        self.tracks.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub(crate) fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub(crate) fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Track> {
        self.tracks.get_mut(index)
    }

    /// Whether this queue was activated from `source` and still has tracks.
    pub(crate) fn is_active_source(&self, source: &str) -> bool {
        !self.tracks.is_empty() && self.source.as_deref() == Some(source)
    }

    pub(crate) fn can_skip_next(&self) -> bool {
        self.index + 1 < self.tracks.len()
    }

    pub(crate) fn can_skip_previous(&self) -> bool {
        !self.tracks.is_empty() && self.index > 0
    }

    /// Shuffle everything except the current track, which moves to the front.
    ///
    /// The result no longer follows a source list's order, so the source is
    /// forgotten and the next selection requeues.
    pub(crate) fn shuffle_pinned(&mut self) {
        if self.tracks.is_empty() {
            return;
        }
        let current = self.tracks.remove(self.index);
        self.tracks.shuffle(&mut rand::rng());
        self.tracks.insert(0, current);
        self.index = 0;
        self.offset = 0;
        self.source = None;
    }
}

/// `[selected] ++ list[selected+1..] ++ list[..selected]`.
pub(crate) fn rotate_from(list: &[Track], selected: usize) -> Vec<Track> {
    list[selected..]
        .iter()
        .chain(&list[..selected])
        .cloned()
        .collect()
}

/// Queue position of list entry `selected` in a queue rotated by `offset`.
pub(crate) fn rotated_position(selected: usize, offset: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (selected % len + len - offset % len) % len
}
