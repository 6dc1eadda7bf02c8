//! Ordered playlist storage
//!
//! A doubly linked list kept in an arena: entries live in a slot vector and
//! refer to their neighbors by `EntryHandle`. Handles stay valid until the
//! entry is unlinked; freed slots are recycled by later appends.

use playlist_common::Track;

/// Stable reference to a playlist entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryHandle(usize);

/// One playlist slot: a track plus the time played so far
#[derive(Debug, Clone)]
pub struct Entry {
    pub track: Track,
    pub elapsed_seconds: u64,
    prev: Option<EntryHandle>,
    next: Option<EntryHandle>,
}

impl Entry {
    /// True once the track has played to its full duration
    pub fn is_complete(&self) -> bool {
        self.elapsed_seconds >= self.track.duration_seconds
    }
}

/// Arena-backed doubly linked playlist
#[derive(Debug, Default)]
pub struct Playlist {
    slots: Vec<Option<Entry>>,
    free: Vec<usize>,
    head: Option<EntryHandle>,
    tail: Option<EntryHandle>,
    len: usize,
}

impl Playlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a playlist holding `tracks` in iteration order
    pub fn from_tracks(tracks: impl IntoIterator<Item = Track>) -> Self {
        let mut playlist = Self::new();
        for track in tracks {
            playlist.push_back(track);
        }
        playlist
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn head(&self) -> Option<EntryHandle> {
        self.head
    }

    pub fn tail(&self) -> Option<EntryHandle> {
        self.tail
    }

    pub fn get(&self, handle: EntryHandle) -> Option<&Entry> {
        self.slots.get(handle.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, handle: EntryHandle) -> Option<&mut Entry> {
        self.slots.get_mut(handle.0).and_then(Option::as_mut)
    }

    pub fn next_of(&self, handle: EntryHandle) -> Option<EntryHandle> {
        self.get(handle).and_then(|entry| entry.next)
    }

    pub fn prev_of(&self, handle: EntryHandle) -> Option<EntryHandle> {
        self.get(handle).and_then(|entry| entry.prev)
    }

    /// Append a track at the tail. O(1).
    pub fn push_back(&mut self, track: Track) -> EntryHandle {
        let entry = Entry {
            track,
            elapsed_seconds: 0,
            prev: self.tail,
            next: None,
        };

        let handle = match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(entry);
                EntryHandle(index)
            }
            None => {
                self.slots.push(Some(entry));
                EntryHandle(self.slots.len() - 1)
            }
        };

        match self.tail.and_then(|tail| self.get_mut(tail)) {
            Some(old_tail) => old_tail.next = Some(handle),
            None => self.head = Some(handle),
        }
        self.tail = Some(handle);
        self.len += 1;

        handle
    }

    /// First entry (in playlist order) carrying `track_id`
    pub fn find(&self, track_id: &str) -> Option<EntryHandle> {
        self.iter()
            .find(|(_, entry)| entry.track.id == track_id)
            .map(|(handle, _)| handle)
    }

    /// Splice an entry out of the list and return its track
    ///
    /// Neighbors are relinked and head/tail move to the neighbor when the
    /// entry sat on a boundary. Returns `None` for a stale handle.
    pub fn unlink(&mut self, handle: EntryHandle) -> Option<Track> {
        let entry = self.slots.get_mut(handle.0)?.take()?;

        match entry.prev {
            Some(prev) => {
                if let Some(prev_entry) = self.get_mut(prev) {
                    prev_entry.next = entry.next;
                }
            }
            None => self.head = entry.next,
        }

        match entry.next {
            Some(next) => {
                if let Some(next_entry) = self.get_mut(next) {
                    next_entry.prev = entry.prev;
                }
            }
            None => self.tail = entry.prev,
        }

        self.free.push(handle.0);
        self.len -= 1;

        Some(entry.track)
    }

    /// Iterate entries from head to tail
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            playlist: self,
            next: self.head,
        }
    }

    /// Snapshot of the tracks in playlist order
    pub fn tracks(&self) -> Vec<Track> {
        self.iter().map(|(_, entry)| entry.track.clone()).collect()
    }
}

/// Head-to-tail iterator over a playlist
pub struct Iter<'a> {
    playlist: &'a Playlist,
    next: Option<EntryHandle>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (EntryHandle, &'a Entry);

    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.next?;
        let entry = self.playlist.get(handle)?;
        self.next = entry.next;
        Some((handle, entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn songs() -> Vec<Track> {
        vec![
            Track::new("uuid1", "artist1 - song1", 4),
            Track::new("uuid2", "artist2 - song2", 3),
            Track::new("uuid3", "artist 3 - song 3", 2),
        ]
    }

    fn ids(playlist: &Playlist) -> Vec<String> {
        playlist.tracks().into_iter().map(|t| t.id).collect()
    }

    #[test]
    fn test_empty_playlist() {
        let playlist = Playlist::new();
        assert_eq!(playlist.len(), 0);
        assert!(playlist.is_empty());
        assert!(playlist.head().is_none());
        assert!(playlist.tail().is_none());
        assert_eq!(playlist.iter().count(), 0);
    }

    #[test]
    fn test_single_entry_is_head_and_tail() {
        let playlist = Playlist::from_tracks(songs().into_iter().take(1));
        let head = playlist.head().unwrap();

        assert_eq!(playlist.len(), 1);
        assert_eq!(playlist.tail(), Some(head));
        assert!(playlist.prev_of(head).is_none());
        assert!(playlist.next_of(head).is_none());
        assert_eq!(playlist.get(head).unwrap().elapsed_seconds, 0);
    }

    #[test]
    fn test_links_for_three_entries() {
        let playlist = Playlist::from_tracks(songs());
        let head = playlist.head().unwrap();
        let middle = playlist.next_of(head).unwrap();
        let tail = playlist.tail().unwrap();

        assert_eq!(playlist.len(), 3);
        assert!(playlist.prev_of(head).is_none());
        assert_eq!(playlist.prev_of(middle), Some(head));
        assert_eq!(playlist.next_of(middle), Some(tail));
        assert_eq!(playlist.prev_of(tail), Some(middle));
        assert!(playlist.next_of(tail).is_none());
        assert_eq!(ids(&playlist), vec!["uuid1", "uuid2", "uuid3"]);
    }

    #[test]
    fn test_unlink_middle_relinks_neighbors() {
        let mut playlist = Playlist::from_tracks(songs());
        let middle = playlist.find("uuid2").unwrap();

        let removed = playlist.unlink(middle).unwrap();
        assert_eq!(removed.id, "uuid2");
        assert_eq!(playlist.len(), 2);

        let head = playlist.head().unwrap();
        assert_eq!(playlist.next_of(head), playlist.tail());
        assert_eq!(playlist.get(playlist.tail().unwrap()).unwrap().track.id, "uuid3");
    }

    #[test]
    fn test_unlink_boundaries_until_empty() {
        let mut playlist = Playlist::from_tracks(songs());

        playlist.unlink(playlist.find("uuid1").unwrap());
        assert_eq!(ids(&playlist), vec!["uuid2", "uuid3"]);
        assert!(playlist.prev_of(playlist.head().unwrap()).is_none());

        playlist.unlink(playlist.find("uuid3").unwrap());
        assert_eq!(playlist.head(), playlist.tail());
        assert_eq!(ids(&playlist), vec!["uuid2"]);

        playlist.unlink(playlist.find("uuid2").unwrap());
        assert!(playlist.is_empty());
        assert!(playlist.head().is_none());
        assert!(playlist.tail().is_none());
    }

    #[test]
    fn test_unlink_stale_handle_is_ignored() {
        let mut playlist = Playlist::from_tracks(songs());
        let handle = playlist.find("uuid1").unwrap();

        assert!(playlist.unlink(handle).is_some());
        assert!(playlist.unlink(handle).is_none());
        assert_eq!(playlist.len(), 2);
    }

    #[test]
    fn test_find_returns_first_duplicate() {
        let mut playlist = Playlist::new();
        let first = playlist.push_back(Track::new("dup", "first", 1));
        playlist.push_back(Track::new("dup", "second", 1));

        assert_eq!(playlist.find("dup"), Some(first));
        assert!(playlist.find("missing").is_none());
    }

    #[test]
    fn test_freed_slots_are_reused_at_tail() {
        let mut playlist = Playlist::from_tracks(songs());
        playlist.unlink(playlist.find("uuid1").unwrap());

        let handle = playlist.push_back(Track::new("uuid4", "song4", 5));
        assert_eq!(playlist.tail(), Some(handle));
        assert_eq!(ids(&playlist), vec!["uuid2", "uuid3", "uuid4"]);
        assert_eq!(playlist.slots.len(), 3);
    }

    #[test]
    fn test_entry_completion() {
        let mut playlist = Playlist::from_tracks(songs().into_iter().take(1));
        let head = playlist.head().unwrap();
        let entry = playlist.get_mut(head).unwrap();

        assert!(!entry.is_complete());
        entry.elapsed_seconds = 4;
        assert!(entry.is_complete());
    }
}
