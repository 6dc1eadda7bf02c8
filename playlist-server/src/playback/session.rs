//! Time-advance task for one playback session
//!
//! A session lives from `play` until the next `pause`, skip or track
//! completion. It wakes once per tick, takes the engine lock and advances
//! the elapsed time of the cursor entry.

use super::engine::{PlaybackEngine, TickOutcome};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error};

/// Handle to a running session task
pub(super) struct Session {
    id: u64,
    stop_tx: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl Session {
    /// Start ticking for `engine` under the given session id
    pub(super) fn spawn(engine: PlaybackEngine, id: u64) -> Self {
        let (stop_tx, stop_rx) = oneshot::channel();
        let handle = tokio::spawn(run(engine, id, stop_rx));
        Self {
            id,
            stop_tx,
            handle,
        }
    }

    pub(super) fn id(&self) -> u64 {
        self.id
    }

    /// Signal the task and wait for it to exit
    ///
    /// Once this returns no further tick of this session can be applied.
    pub(super) async fn stop(self) {
        // The task may already have exited on its own
        let _ = self.stop_tx.send(());

        if let Err(e) = self.handle.await {
            if e.is_panic() {
                error!(session = self.id, "Playback session panicked: {}", e);
            }
        }
    }
}

async fn run(engine: PlaybackEngine, id: u64, mut stop_rx: oneshot::Receiver<()>) {
    let period = engine.tick_interval();
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    debug!(session = id, "Playback session started");

    loop {
        tokio::select! {
            biased;
            _ = &mut stop_rx => {
                debug!(session = id, "Playback session stopped");
                return;
            }
            _ = ticker.tick() => {}
        }

        // The stopper may hold the lock while it waits for this task
        let outcome = {
            let mut transport = tokio::select! {
                biased;
                _ = &mut stop_rx => {
                    debug!(session = id, "Playback session stopped");
                    return;
                }
                guard = engine.transport.lock() => guard,
            };
            engine.on_tick(&mut transport, id)
        };

        match outcome {
            TickOutcome::Continue => {}
            TickOutcome::Finished | TickOutcome::Ended => {
                debug!(session = id, ?outcome, "Playback session ended");
                return;
            }
            TickOutcome::Advance => {
                engine.spawn_auto_advance();
                return;
            }
        }
    }
}
