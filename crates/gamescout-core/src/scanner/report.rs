/// The scan report — everything the presentation layer needs to render
/// a summary and drive relocation prompts after a scan.
use crate::exceptions::ExceptionSet;
use crate::model::Game;

/// A catalogued game whose resolved target no longer exists on disk.
///
/// Reported, never auto-deleted: the caller prompts the user to
/// relocate or remove.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingGame {
    pub title: String,
    pub library_name: String,
    /// The absolute path the catalog expected to find.
    pub expected_path: String,
}

/// A single directory or file skipped during traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub path: String,
    pub message: String,
}

/// Aggregated results of one strategy pass.
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    /// Titles of games newly added to the catalog.
    pub games_added: Vec<String>,
    /// Library-managed games whose targets were not found during
    /// validation.
    pub games_missing: Vec<MissingGame>,
    /// Configured library roots that no longer exist. Their games are
    /// kept but not counted valid.
    pub libraries_missing: Vec<String>,
    /// Exception entries auto-added for passed-over executables.
    pub exceptions_added: Vec<String>,
    /// Non-fatal per-entry failures (permission denied and the like).
    pub skipped: Vec<SkippedEntry>,
    /// Library-managed games that validated successfully.
    pub games_valid: usize,
    /// Directories actually examined for executables (excluded and
    /// known-game directories are not counted).
    pub directories_scanned: usize,
}

/// The complete result of a strategy pass, handed back to the caller
/// who decides whether to apply and save it.
///
/// On cancellation, `catalog` and `exceptions` contain exactly the
/// per-library passes that completed before the flag was observed —
/// nothing from the in-progress library.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub catalog: Vec<Game>,
    pub exceptions: ExceptionSet,
    pub report: ScanReport,
    pub cancelled: bool,
}
