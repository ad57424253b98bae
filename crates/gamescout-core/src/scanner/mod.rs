/// Scanner module — background library scanning.
///
/// [`start_scan`] spawns a single dedicated worker thread that runs one
/// strategy pass over snapshots of the catalog and configuration,
/// reporting progress through a bounded crossbeam channel. The worker
/// performs no internal fan-out — directories are visited sequentially,
/// which bounds filesystem contention and keeps ordering deterministic.
pub mod orchestrate;
pub mod progress;
pub mod report;

pub use orchestrate::{ScanStrategy, Scanner};
pub use progress::ScanProgress;
pub use report::{MissingGame, ScanOutcome, ScanReport, SkippedEntry};

use crate::exceptions::ExceptionSet;
use crate::model::{Game, Library};
use crossbeam_channel::Receiver;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::info;

/// Maximum number of progress messages that may queue in the channel.
///
/// The worker sends one `Update` per directory; when the consumer falls
/// behind the worker blocks on `send` rather than consuming unbounded
/// heap. Cancellation is still prompt: the flag is polled on the next
/// directory boundary once the send completes.
pub const PROGRESS_CHANNEL_CAPACITY: usize = 256;

/// Handle to a running or completed scan. Allows cancellation,
/// receiving progress updates, and collecting the outcome.
pub struct ScanHandle {
    /// Receiver for progress updates from the scan worker.
    pub progress_rx: Receiver<ScanProgress>,
    /// Flag to request cancellation.
    cancel_flag: Arc<AtomicBool>,
    /// Join handle for the worker thread.
    thread: Option<thread::JoinHandle<ScanOutcome>>,
}

impl ScanHandle {
    /// Request the scan to stop at the next directory boundary.
    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::Relaxed);
    }

    /// Check whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::Relaxed)
    }

    /// Wait for the worker and return its outcome.
    ///
    /// Drains any remaining progress messages while waiting so a full
    /// channel can never wedge the worker against a joiner.
    pub fn join(mut self) -> ScanOutcome {
        let thread = self.thread.take().expect("scan thread already joined");
        while !thread.is_finished() {
            let _ = self.progress_rx.recv_timeout(Duration::from_millis(20));
        }
        let _ = self.progress_rx.try_iter().count();
        thread.join().expect("scan worker panicked")
    }
}

/// Start a strategy pass on a background worker thread.
///
/// `libraries`, `catalog`, and `exceptions` are snapshots taken by the
/// caller (under the store's scan flag); the worker never touches the
/// store. Apply the returned outcome with
/// `CatalogStore::apply_scan_outcome`, then save.
pub fn start_scan(
    strategy: ScanStrategy,
    libraries: Vec<Library>,
    catalog: Vec<Game>,
    exceptions: ExceptionSet,
) -> ScanHandle {
    let (progress_tx, progress_rx) =
        crossbeam_channel::bounded::<ScanProgress>(PROGRESS_CHANNEL_CAPACITY);
    let cancel_flag = Arc::new(AtomicBool::new(false));
    let cancel_clone = cancel_flag.clone();

    let thread = thread::Builder::new()
        .name("gamescout-scanner".into())
        .spawn(move || {
            info!(
                "starting {:?} scan over {} libraries",
                strategy,
                libraries.len()
            );
            let scanner = Scanner::default();
            scanner.run(
                &strategy,
                &libraries,
                &catalog,
                &exceptions,
                &progress_tx,
                &cancel_clone,
            )
        })
        .expect("failed to spawn scanner thread");

    ScanHandle {
        progress_rx,
        cancel_flag,
        thread: Some(thread),
    }
}
