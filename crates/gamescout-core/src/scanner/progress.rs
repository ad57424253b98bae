/// Scan progress reporting — lightweight messages sent from the scan
/// worker to the presentation thread via a crossbeam channel.
///
/// The actual results travel in the [`super::ScanOutcome`] returned by
/// `ScanHandle::join`; these messages carry only counters and status
/// flags for rendering a progress indicator.
#[derive(Debug, Clone)]
pub enum ScanProgress {
    /// A library pass is starting. `directories_total` sizes the
    /// progress bar for this library.
    LibraryStarted {
        library: String,
        directories_total: usize,
    },
    /// Periodic update, sent once per directory, before that directory
    /// is examined. `directories_done` counts the directories completed
    /// so far, so it runs `0..directories_total` and never reaches the
    /// total — [`ScanProgress::LibraryFinished`] marks completion.
    Update {
        library: String,
        directories_done: usize,
        games_found: usize,
        current_path: String,
    },
    /// A non-fatal skip (e.g. permission denied on one directory).
    Skipped { path: String, message: String },
    /// One library's pass finished and its results are committed.
    LibraryFinished { library: String, games_found: usize },
    /// The whole strategy pass completed.
    Complete,
    /// The scan was cancelled; the outcome holds only the passes that
    /// committed before cancellation was observed.
    Cancelled,
}
