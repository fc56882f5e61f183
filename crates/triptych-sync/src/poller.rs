//! Background polling driver: one unconditional initial load, then a fixed
//! interval of "newer than the high-water mark" fetches.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, warn};

use triptych_client::{FetchKind, MessageSource};

use crate::board::Board;
use crate::events::MergeKind;

/// Poll cadence of the reference behavior.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Handle over the polling task. Dropping the handle leaves the task
/// running; call [`Poller::shutdown`] to stop it.
pub struct Poller {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl Poller {
    /// Spawn the driver: an `Initial` fetch immediately, then a `Newer`
    /// fetch every `interval`.
    ///
    /// Each tick reads the high-water mark from the board at fire time. A
    /// captured copy would silently re-request from a stale id forever.
    pub fn spawn<S>(board: Board, source: S, interval: Duration) -> Self
    where
        S: MessageSource + 'static,
    {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            run_fetch(&board, &source, FetchKind::Initial, MergeKind::Initial).await;

            let mut ticker = time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // interval() fires immediately; the initial load already ran, so
            // consume the first tick and start the cadence one period out.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let since = board.highest_seen_id();
                        run_fetch(&board, &source, FetchKind::Newer { since }, MergeKind::Newer).await;
                    }
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                    }
                }
            }

            debug!("Poller stopped");
        });

        Self { shutdown_tx, task }
    }

    /// Stop the timer and wait for the task to wind down. In-flight requests
    /// are not aborted; a late completion merges idempotently or is dropped
    /// with the task.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        let _ = self.task.await;
    }
}

/// One fetch through the shared lifecycle: loading flag up, then merge on
/// success or error recording on failure. The next tick retries implicitly.
pub async fn run_fetch<S: MessageSource>(
    board: &Board,
    source: &S,
    kind: FetchKind,
    merge: MergeKind,
) {
    board.begin_fetch();
    match source.fetch(kind).await {
        Ok(batch) => board.complete_fetch(merge, batch),
        Err(e) => {
            warn!("Fetch failed: {}", e);
            board.fail_fetch(e.to_string());
        }
    }
}

/// User-triggered backwards page, through the same lifecycle as the timer.
pub async fn load_older<S: MessageSource>(board: &Board, source: &S) {
    run_fetch(board, source, FetchKind::Older, MergeKind::Older).await;
}
