//! Playback engine
//!
//! **Responsibilities:**
//! - Own the playlist and the transport state (cursor, playing/paused)
//! - Serialize every command behind one exclusive lock
//! - Start and stop the per-session time-advance task
//! - Broadcast `PlaylistEvent`s on every observable change
//!
//! The lock covers the playlist, the cursor, the transport state and the
//! running session handle together. Skip commands stop the old session,
//! move the cursor and start the new session without releasing it.

use super::playlist::{EntryHandle, Playlist};
use super::session::Session;
use playlist_common::{PlaybackState, PlayerInfo, PlaylistEvent, Track};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

/// Default interval between elapsed-time increments
pub const DEFAULT_TICK: Duration = Duration::from_secs(1);

/// Result of a remove request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The first entry carrying the id was spliced out
    Removed,
    /// No entry carries the id; the playlist is unchanged
    NotFound,
    /// The id belongs to the track that is playing right now; nothing changed
    CurrentlyPlaying,
}

/// Consistent view of the transport taken under a single lock acquisition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransportSnapshot {
    pub state: PlaybackState,
    pub length: usize,
    pub current: Option<PlayerInfo>,
}

/// What the time-advance task should do after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum TickOutcome {
    /// Keep ticking
    Continue,
    /// The tail finished; playback stopped
    Finished,
    /// The track finished and has a successor; skip to it
    Advance,
    /// The session is no longer the active one
    Ended,
}

/// State guarded by the engine lock
pub(super) struct Transport {
    pub(super) playlist: Playlist,
    pub(super) cursor: Option<EntryHandle>,
    pub(super) state: PlaybackState,
    pub(super) session: Option<Session>,
    next_session_id: u64,
    /// Set by `shutdown`; no session starts afterwards
    closed: bool,
}

impl Transport {
    fn new(playlist: Playlist) -> Self {
        Self {
            playlist,
            cursor: None,
            state: PlaybackState::Stopped,
            session: None,
            next_session_id: 0,
            closed: false,
        }
    }

    fn current_track(&self) -> Option<&Track> {
        self.cursor
            .and_then(|cursor| self.playlist.get(cursor))
            .map(|entry| &entry.track)
    }

    fn player_info(&self) -> Option<PlayerInfo> {
        let entry = self.playlist.get(self.cursor?)?;
        Some(PlayerInfo {
            title: entry.track.title.clone(),
            duration_seconds: entry.track.duration_seconds,
            elapsed_seconds: entry.elapsed_seconds,
        })
    }

    fn reset_elapsed(&mut self, handle: EntryHandle) {
        if let Some(entry) = self.playlist.get_mut(handle) {
            entry.elapsed_seconds = 0;
        }
    }

    /// Move the cursor, resetting elapsed time on both ends
    fn move_cursor(&mut self, to: EntryHandle) {
        if let Some(from) = self.cursor {
            self.reset_elapsed(from);
        }
        self.reset_elapsed(to);
        self.cursor = Some(to);
    }
}

fn is_playable(track: &Track) -> bool {
    track.duration_seconds > 0
}

/// Playback engine
///
/// Cheap to clone; clones share the same playlist and transport.
#[derive(Clone)]
pub struct PlaybackEngine {
    pub(super) transport: Arc<Mutex<Transport>>,
    events: broadcast::Sender<PlaylistEvent>,
    tick: Duration,
}

impl PlaybackEngine {
    /// Create an engine over `tracks` (in order) with the default one-second tick
    ///
    /// Tracks with a zero duration are skipped, as in `add`.
    pub fn new(tracks: impl IntoIterator<Item = Track>) -> Self {
        Self::with_tick(tracks, DEFAULT_TICK)
    }

    /// Create an engine with a custom tick interval
    pub fn with_tick(tracks: impl IntoIterator<Item = Track>, tick: Duration) -> Self {
        let playlist = Playlist::from_tracks(tracks.into_iter().filter(is_playable));
        info!(
            "Playback engine created with {} tracks (tick {:?})",
            playlist.len(),
            tick
        );

        // Buffer up to 100 events per subscriber
        let (events, _) = broadcast::channel(100);

        Self {
            transport: Arc::new(Mutex::new(Transport::new(playlist))),
            events,
            tick,
        }
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick
    }

    /// Subscribe to engine events
    pub fn subscribe(&self) -> broadcast::Receiver<PlaylistEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: PlaylistEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    fn set_state(&self, transport: &mut Transport, new_state: PlaybackState) {
        let old_state = transport.state;
        if old_state == new_state {
            return;
        }
        transport.state = new_state;
        debug!(%old_state, %new_state, "Transport state changed");
        self.emit(PlaylistEvent::PlaybackStateChanged {
            old_state,
            new_state,
            timestamp: chrono::Utc::now(),
        });
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Append a track at the tail
    ///
    /// A zero-duration track could never satisfy "elapsed < duration" while
    /// playing, so it is logged and not admitted. The track store rejects
    /// such tracks before they reach the engine.
    pub async fn add(&self, track: Track) {
        if !is_playable(&track) {
            warn!(track_id = %track.id, "Ignoring track with zero duration");
            return;
        }

        let mut transport = self.transport.lock().await;
        debug!(track_id = %track.id, "Adding track");
        transport.playlist.push_back(track);
        let length = transport.playlist.len();
        self.emit(PlaylistEvent::PlaylistChanged {
            length,
            timestamp: chrono::Utc::now(),
        });
    }

    /// Remove the first entry carrying `track_id`
    ///
    /// The track that is playing right now cannot be removed. A paused or
    /// stopped cursor entry can; the cursor then moves to its successor
    /// (or predecessor when it was the tail) and playback is stopped.
    pub async fn remove(&self, track_id: &str) -> RemoveOutcome {
        let mut transport = self.transport.lock().await;

        if transport.state.is_playing()
            && transport.current_track().is_some_and(|t| t.id == track_id)
        {
            debug!(track_id, "Refusing to remove the playing track");
            return RemoveOutcome::CurrentlyPlaying;
        }

        let Some(handle) = transport.playlist.find(track_id) else {
            debug!(track_id, "Track not in playlist");
            return RemoveOutcome::NotFound;
        };

        if transport.cursor == Some(handle) {
            let neighbor = transport
                .playlist
                .next_of(handle)
                .or_else(|| transport.playlist.prev_of(handle));
            transport.cursor = None;
            if let Some(neighbor) = neighbor {
                transport.move_cursor(neighbor);
            }
            self.set_state(&mut transport, PlaybackState::Stopped);
        }

        transport.playlist.unlink(handle);
        let length = transport.playlist.len();
        info!(track_id, length, "Removed track from playlist");
        self.emit(PlaylistEvent::PlaylistChanged {
            length,
            timestamp: chrono::Utc::now(),
        });

        RemoveOutcome::Removed
    }

    /// Start or resume playback
    ///
    /// No-op when already playing or when the playlist is empty. An unset
    /// cursor starts at the head.
    pub async fn play(&self) {
        let mut transport = self.transport.lock().await;
        self.start_session(&mut transport);
    }

    /// Pause playback
    ///
    /// Returns only after the time-advance task has stopped, so a following
    /// `play()` resumes from exactly the elapsed value seen here.
    pub async fn pause(&self) {
        let mut transport = self.transport.lock().await;
        self.halt(&mut transport).await;
    }

    /// Skip to the next track and play it
    ///
    /// No-op at the tail. From an unset cursor with at least three entries
    /// this lands on the second entry, not the first.
    pub async fn next(&self) {
        let mut transport = self.transport.lock().await;

        if transport.closed {
            debug!("Next ignored: engine shut down");
            return;
        }

        if transport.cursor == transport.playlist.tail() {
            debug!("Next ignored: cursor at tail");
            return;
        }

        self.halt(&mut transport).await;

        let target = match transport.cursor {
            Some(current) => transport.playlist.next_of(current),
            // Unset cursor with more than two entries: compatibility quirk
            None if transport.playlist.len() > 2 => transport
                .playlist
                .head()
                .and_then(|head| transport.playlist.next_of(head)),
            None => None,
        };

        if let Some(target) = target {
            transport.move_cursor(target);
            self.start_session(&mut transport);
        }
    }

    /// Skip to the previous track and play it
    ///
    /// No-op when the cursor is unset or at the head.
    pub async fn previous(&self) {
        let mut transport = self.transport.lock().await;

        if transport.closed {
            debug!("Previous ignored: engine shut down");
            return;
        }

        let Some(current) = transport.cursor else {
            debug!("Previous ignored: no cursor");
            return;
        };
        if Some(current) == transport.playlist.head() {
            debug!("Previous ignored: cursor at head");
            return;
        }

        self.halt(&mut transport).await;

        if let Some(target) = transport.playlist.prev_of(current) {
            transport.move_cursor(target);
            self.start_session(&mut transport);
        }
    }

    /// Stop any running session before the service exits
    ///
    /// Afterwards no command starts a new session, including an
    /// auto-advance that was already on its way.
    pub async fn shutdown(&self) {
        let mut transport = self.transport.lock().await;
        transport.closed = true;
        self.halt(&mut transport).await;
        info!("Playback engine shut down");
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Title, duration and elapsed time of the cursor entry
    pub async fn status(&self) -> Option<PlayerInfo> {
        self.transport.lock().await.player_info()
    }

    pub async fn snapshot(&self) -> TransportSnapshot {
        let transport = self.transport.lock().await;
        TransportSnapshot {
            state: transport.state,
            length: transport.playlist.len(),
            current: transport.player_info(),
        }
    }

    pub async fn state(&self) -> PlaybackState {
        self.transport.lock().await.state
    }

    pub async fn is_playing(&self) -> bool {
        self.state().await.is_playing()
    }

    /// True when `track_id` is the track playing right now
    ///
    /// Callers check this before `remove` to report "currently playing"
    /// separately from "not found".
    pub async fn is_playing_track(&self, track_id: &str) -> bool {
        let transport = self.transport.lock().await;
        transport.state.is_playing() && transport.current_track().is_some_and(|t| t.id == track_id)
    }

    pub async fn current_track(&self) -> Option<Track> {
        self.transport.lock().await.current_track().cloned()
    }

    /// Tracks in playlist order
    pub async fn tracks(&self) -> Vec<Track> {
        self.transport.lock().await.playlist.tracks()
    }

    pub async fn len(&self) -> usize {
        self.transport.lock().await.playlist.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    // ========================================================================
    // Session management (lock held by caller)
    // ========================================================================

    fn start_session(&self, transport: &mut Transport) {
        if transport.closed || transport.state.is_playing() || transport.playlist.is_empty() {
            return;
        }

        let cursor = match transport.cursor.or_else(|| transport.playlist.head()) {
            Some(cursor) => cursor,
            None => return,
        };

        // A finished track is waiting for its auto-advance
        if transport.playlist.get(cursor).is_some_and(|entry| entry.is_complete()) {
            debug!("Play ignored: auto-advance pending");
            return;
        }
        transport.cursor = Some(cursor);

        transport.next_session_id += 1;
        let session_id = transport.next_session_id;
        transport.session = Some(Session::spawn(self.clone(), session_id));
        self.set_state(transport, PlaybackState::Playing);

        if let Some(entry) = transport.playlist.get(cursor) {
            info!(
                session = session_id,
                track_id = %entry.track.id,
                elapsed = entry.elapsed_seconds,
                "Playing \"{}\"",
                entry.track.title
            );
            if entry.elapsed_seconds == 0 {
                self.emit(PlaylistEvent::TrackStarted {
                    track_id: entry.track.id.clone(),
                    title: entry.track.title.clone(),
                    duration_seconds: entry.track.duration_seconds,
                    timestamp: chrono::Utc::now(),
                });
            }
        }
    }

    async fn halt(&self, transport: &mut Transport) {
        if !transport.state.is_playing() {
            return;
        }
        if let Some(session) = transport.session.take() {
            session.stop().await;
        }
        self.set_state(transport, PlaybackState::Paused);
    }

    /// Advance elapsed time of the cursor entry by one tick
    ///
    /// Called by the session task with the lock held.
    pub(super) fn on_tick(&self, transport: &mut Transport, session_id: u64) -> TickOutcome {
        let active = transport.state.is_playing()
            && transport.session.as_ref().map(Session::id) == Some(session_id);
        let Some(cursor) = transport.cursor.filter(|_| active) else {
            return TickOutcome::Ended;
        };
        let at_tail = transport.playlist.tail() == Some(cursor);

        let Some(entry) = transport.playlist.get_mut(cursor) else {
            return TickOutcome::Ended;
        };
        entry.elapsed_seconds += 1;
        if !entry.is_complete() {
            return TickOutcome::Continue;
        }

        let track_id = entry.track.id.clone();
        if at_tail {
            entry.elapsed_seconds = 0;
        }

        // The session ends itself; dropping the handle detaches the task
        transport.session = None;
        self.set_state(transport, PlaybackState::Stopped);

        if at_tail {
            info!(%track_id, "Reached end of playlist");
            self.emit(PlaylistEvent::PlaybackFinished {
                track_id,
                timestamp: chrono::Utc::now(),
            });
            TickOutcome::Finished
        } else {
            debug!(%track_id, "Track complete, advancing");
            TickOutcome::Advance
        }
    }

    /// Run `next()` on a fresh task
    ///
    /// Auto-advance is not synchronous with the tick that finished the
    /// track, so observers may briefly see the engine stopped in between.
    pub(super) fn spawn_auto_advance(&self) {
        let engine = self.clone();
        tokio::spawn(async move {
            engine.next().await;
        });
    }
}
