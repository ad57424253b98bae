/// Scan orchestration — the three strategies over one core traversal.
///
/// A strategy pass validates the existing catalog, then walks each
/// configured library in turn. Each library's results are committed to
/// the working catalog only when that library's pass completes, so a
/// cancellation observed mid-library discards exactly the in-progress
/// pass and nothing else.
use crate::exceptions::{AutoExcluder, ExceptionSet};
use crate::model::{Game, Library, Platform};
use crate::paths;
use crate::scanner::progress::ScanProgress;
use crate::scanner::report::{MissingGame, ScanOutcome, ScanReport, SkippedEntry};
use crate::walker;
use crossbeam_channel::Sender;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

/// Which directories a pass visits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanStrategy {
    /// Every directory in every configured library (user-initiated
    /// full refresh).
    Full,
    /// Skip directories already associated with a catalogued game
    /// (startup, routine refresh).
    Incremental,
    /// Full traversal for the named newly-added libraries, incremental
    /// for the rest (adding a library path).
    Targeted { new_libraries: Vec<String> },
}

/// The scanning engine. Owns the heuristic matcher and the depth cap;
/// holds no catalog state, so one instance can run any number of
/// passes.
#[derive(Debug, Clone)]
pub struct Scanner {
    excluder: AutoExcluder,
    max_depth: usize,
}

impl Default for Scanner {
    fn default() -> Self {
        Self {
            excluder: AutoExcluder::default(),
            max_depth: walker::MAX_DEPTH,
        }
    }
}

/// Results of one library's pass, buffered until the pass completes.
struct LibraryPass {
    games: Vec<Game>,
    /// Working copy of the exception set including this pass's adds.
    exceptions: ExceptionSet,
    exceptions_added: Vec<String>,
    platform_merges: Vec<String>,
    skipped: Vec<SkippedEntry>,
    directories_scanned: usize,
}

impl Scanner {
    pub fn new(excluder: AutoExcluder, max_depth: usize) -> Self {
        Self {
            excluder,
            max_depth,
        }
    }

    /// Run one strategy pass synchronously.
    ///
    /// `catalog` and `exceptions` are snapshots; the returned
    /// [`ScanOutcome`] is a complete replacement the caller applies (or
    /// discards) explicitly — nothing is persisted here. Cancellation
    /// is polled between directory visits, never mid-read.
    pub fn run(
        &self,
        strategy: &ScanStrategy,
        libraries: &[Library],
        catalog: &[Game],
        exceptions: &ExceptionSet,
        progress: &Sender<ScanProgress>,
        cancel: &AtomicBool,
    ) -> ScanOutcome {
        let mut report = ScanReport::default();
        let mut out_catalog = catalog.to_vec();
        let mut out_exceptions = exceptions.clone();

        let (present, missing): (Vec<&Library>, Vec<&Library>) =
            libraries.iter().partition(|l| l.path.is_dir());
        let missing_names: Vec<String> = missing
            .iter()
            .map(|lib| {
                warn!("library root missing: {} ({})", lib.name, lib.path.display());
                lib.name.clone()
            })
            .collect();
        report.libraries_missing = missing_names.clone();

        self.validate_catalog(&out_catalog, libraries, &missing_names, &mut report);

        let mut cancelled = cancel.load(Ordering::Relaxed);

        if !cancelled {
            for lib in present {
                if cancel.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
                let full = match strategy {
                    ScanStrategy::Full => true,
                    ScanStrategy::Incremental => false,
                    ScanStrategy::Targeted { new_libraries } => {
                        new_libraries.contains(&lib.name)
                    }
                };
                match self.scan_library(lib, full, &out_catalog, &out_exceptions, progress, cancel)
                {
                    Some(pass) => {
                        let games_found = pass.games.len();
                        self.commit_pass(lib, pass, &mut out_catalog, &mut out_exceptions, &mut report);
                        let _ = progress.send(ScanProgress::LibraryFinished {
                            library: lib.name.clone(),
                            games_found,
                        });
                    }
                    None => {
                        info!("scan cancelled during library {}", lib.name);
                        cancelled = true;
                        break;
                    }
                }
            }
        }

        let _ = progress.send(if cancelled {
            ScanProgress::Cancelled
        } else {
            ScanProgress::Complete
        });

        ScanOutcome {
            catalog: out_catalog,
            exceptions: out_exceptions,
            report,
            cancelled,
        }
    }

    /// Existence check for every library-managed game, before any
    /// traversal. Missing targets are reported, never deleted; games in
    /// a missing library are neither validated nor reported per-game —
    /// the missing root already covers them.
    fn validate_catalog(
        &self,
        catalog: &[Game],
        libraries: &[Library],
        missing_libraries: &[String],
        report: &mut ScanReport,
    ) {
        for game in catalog.iter().filter(|g| g.is_library_managed()) {
            if missing_libraries.contains(&game.library_name) {
                continue;
            }
            match paths::to_absolute(&game.launch_path, &game.library_name, libraries) {
                Some(abs) if abs.exists() => report.games_valid += 1,
                Some(abs) => report.games_missing.push(MissingGame {
                    title: game.title.clone(),
                    library_name: game.library_name.clone(),
                    expected_path: paths::normalize_path(&abs),
                }),
                None => report.games_missing.push(MissingGame {
                    title: game.title.clone(),
                    library_name: game.library_name.clone(),
                    expected_path: game.launch_path.clone(),
                }),
            }
        }
    }

    /// Core traversal for one library. Returns `None` when cancellation
    /// was observed mid-pass — the caller then discards the partial
    /// results.
    fn scan_library(
        &self,
        lib: &Library,
        full_traversal: bool,
        catalog: &[Game],
        exceptions: &ExceptionSet,
        progress: &Sender<ScanProgress>,
        cancel: &AtomicBool,
    ) -> Option<LibraryPass> {
        let known_dirs: HashSet<PathBuf> = if full_traversal {
            HashSet::new()
        } else {
            catalog
                .iter()
                .filter(|g| g.is_library_managed() && g.library_name == lib.name)
                .filter_map(|g| {
                    paths::to_absolute(&g.launch_path, &lib.name, std::slice::from_ref(lib))
                })
                .filter_map(|p| p.parent().map(Path::to_path_buf))
                .collect()
        };

        let dirs = walker::collect_directories(&lib.path, self.max_depth, exceptions);
        let _ = progress.send(ScanProgress::LibraryStarted {
            library: lib.name.clone(),
            directories_total: dirs.len(),
        });
        info!(
            "scanning library {} ({} directories, {})",
            lib.name,
            dirs.len(),
            if full_traversal { "full" } else { "incremental" }
        );

        let mut pass = LibraryPass {
            games: Vec::new(),
            exceptions: exceptions.clone(),
            exceptions_added: Vec::new(),
            platform_merges: Vec::new(),
            skipped: Vec::new(),
            directories_scanned: 0,
        };

        for (done, dir) in dirs.iter().enumerate() {
            // Cooperative cancellation checkpoint — directory
            // granularity only, never mid-read.
            if cancel.load(Ordering::Relaxed) {
                return None;
            }
            let _ = progress.send(ScanProgress::Update {
                library: lib.name.clone(),
                directories_done: done,
                games_found: pass.games.len(),
                current_path: dir.display().to_string(),
            });

            if !full_traversal && known_dirs.contains(dir) {
                continue;
            }

            if let Err(err) = fs::read_dir(dir) {
                let entry = SkippedEntry {
                    path: dir.display().to_string(),
                    message: err.to_string(),
                };
                let _ = progress.send(ScanProgress::Skipped {
                    path: entry.path.clone(),
                    message: entry.message.clone(),
                });
                pass.skipped.push(entry);
                continue;
            }
            pass.directories_scanned += 1;

            let picked = walker::pick_executable(dir);
            let Some(selected) = picked.selected else {
                continue;
            };
            let Some(rel) = paths::relative_to(&selected, &lib.path) else {
                continue;
            };

            // Every candidate not selected becomes a documented file
            // exception, so the exceptions UI shows the concrete paths
            // the scanner passed over.
            for other in &picked.passed_over {
                if let Some(other_rel) = paths::relative_to(other, &lib.path) {
                    if pass.exceptions.add(&other_rel) {
                        pass.exceptions_added.push(other_rel);
                    }
                }
            }

            if self.excluder.should_auto_exclude(&selected) {
                if pass.exceptions.add(&rel) {
                    pass.exceptions_added.push(rel);
                }
                continue;
            }
            if pass.exceptions.is_match(&rel) {
                continue;
            }

            // Re-discovery of a catalogued game records the platform,
            // nothing else.
            if catalog
                .iter()
                .any(|g| g.is_library_managed() && g.library_name == lib.name && g.launch_path == rel)
            {
                pass.platform_merges.push(rel);
                continue;
            }
            if pass.games.iter().any(|g| g.launch_path == rel) {
                continue;
            }

            let inferred = walker::infer_metadata(&rel);
            let mut game = Game::discovered(inferred.title, rel, lib.name.clone());
            game.genre = inferred.genre;
            game.developer = inferred.developer;
            pass.games.push(game);
        }

        Some(pass)
    }

    fn commit_pass(
        &self,
        lib: &Library,
        pass: LibraryPass,
        out_catalog: &mut Vec<Game>,
        out_exceptions: &mut ExceptionSet,
        report: &mut ScanReport,
    ) {
        for rel in pass.platform_merges {
            if let Some(game) = out_catalog
                .iter_mut()
                .find(|g| g.library_name == lib.name && g.launch_path == rel)
            {
                game.add_platform(Platform::current());
            }
        }
        report
            .games_added
            .extend(pass.games.iter().map(|g| g.title.clone()));
        out_catalog.extend(pass.games);
        *out_exceptions = pass.exceptions;
        report.exceptions_added.extend(pass.exceptions_added);
        report.skipped.extend(pass.skipped);
        report.directories_scanned += pass.directories_scanned;
    }
}
