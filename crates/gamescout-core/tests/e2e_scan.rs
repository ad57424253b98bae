/// End-to-end scanner integration tests.
///
/// These exercise the real strategy passes against real temporary
/// filesystems — traversal, exclusion, metadata inference, per-library
/// commit, and cancellation — with zero mocking. The synchronous tests
/// call `Scanner::run` directly over an unbounded channel; the
/// cancellation test uses the spawned worker and the bounded channel's
/// backpressure to make mid-library cancellation deterministic.
use gamescout_core::exceptions::ExceptionSet;
use gamescout_core::model::{Game, Library};
use gamescout_core::scanner::{start_scan, ScanOutcome, ScanProgress, ScanStrategy, Scanner};
use gamescout_core::walker;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::time::Duration;
use tempfile::TempDir;

// ── Helpers ──────────────────────────────────────────────────────────

/// Create a file the platform treats as an executable candidate
/// (execute bit on Unix; the `.exe` extension covers Windows).
fn write_exe(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, b"\x7fELF").unwrap();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    }
}

fn library(name: &str, root: &Path) -> Library {
    Library {
        name: name.to_string(),
        path: root.to_path_buf(),
    }
}

/// Run one synchronous pass over an unbounded channel (no
/// backpressure, so single-threaded tests cannot wedge).
fn run_pass(
    strategy: ScanStrategy,
    libraries: &[Library],
    catalog: &[Game],
    exceptions: &ExceptionSet,
) -> ScanOutcome {
    let (tx, _rx) = crossbeam_channel::unbounded();
    Scanner::default().run(
        &strategy,
        libraries,
        catalog,
        exceptions,
        &tx,
        &AtomicBool::new(false),
    )
}

fn find<'a>(outcome: &'a ScanOutcome, launch_path: &str) -> &'a Game {
    outcome
        .catalog
        .iter()
        .find(|g| g.launch_path == launch_path)
        .unwrap_or_else(|| panic!("no game with launch path {launch_path}"))
}

// ── Discovery and metadata ───────────────────────────────────────────

#[test]
fn full_scan_discovers_games_with_depth_inferred_metadata() {
    let tmp = TempDir::new().unwrap();
    write_exe(&tmp.path().join("doom.exe"));
    write_exe(&tmp.path().join("Doom Eternal/play.exe"));
    write_exe(&tmp.path().join("id Software/Quake/quake.exe"));
    write_exe(&tmp.path().join("FPS/Valve/Half-Life/hl.exe"));

    let libs = vec![library("Games", tmp.path())];
    let outcome = run_pass(ScanStrategy::Full, &libs, &[], &ExceptionSet::default());
    assert!(!outcome.cancelled);
    assert_eq!(outcome.catalog.len(), 4);

    let root_level = find(&outcome, "doom.exe");
    assert_eq!(root_level.title, "doom");
    assert_eq!(root_level.genre, "");
    assert_eq!(root_level.developer, "");

    let depth1 = find(&outcome, "Doom Eternal/play.exe");
    assert_eq!(depth1.title, "Doom Eternal");

    let depth2 = find(&outcome, "id Software/Quake/quake.exe");
    assert_eq!(depth2.developer, "id Software");
    assert_eq!(depth2.title, "Quake");

    let depth3 = find(&outcome, "FPS/Valve/Half-Life/hl.exe");
    assert_eq!(depth3.genre, "FPS");
    assert_eq!(depth3.developer, "Valve");
    assert_eq!(depth3.title, "Half-Life");
    assert_eq!(depth3.library_name, "Games");
}

#[test]
fn passed_over_candidates_become_file_exceptions() {
    let tmp = TempDir::new().unwrap();
    write_exe(&tmp.path().join("Doom/play.exe"));
    write_exe(&tmp.path().join("Doom/crashhandler.exe"));

    let libs = vec![library("Games", tmp.path())];
    let outcome = run_pass(ScanStrategy::Full, &libs, &[], &ExceptionSet::default());

    assert_eq!(outcome.catalog.len(), 1);
    assert_eq!(outcome.catalog[0].launch_path, "Doom/play.exe");
    assert!(outcome.exceptions.is_match("Doom/crashhandler.exe"));
    assert_eq!(
        outcome.report.exceptions_added,
        vec!["Doom/crashhandler.exe".to_string()]
    );
}

#[test]
fn auto_excluded_selection_is_documented_not_catalogued() {
    let tmp = TempDir::new().unwrap();
    // The only executable in the directory is an installer.
    write_exe(&tmp.path().join("Redist/vcredist_x64.exe"));

    let libs = vec![library("Games", tmp.path())];
    let outcome = run_pass(ScanStrategy::Full, &libs, &[], &ExceptionSet::default());

    assert!(outcome.catalog.is_empty());
    assert!(outcome.exceptions.is_match("Redist/vcredist_x64.exe"));
}

#[test]
fn pick_priority_prefers_launch_stems_then_directory_name() {
    let tmp = TempDir::new().unwrap();
    write_exe(&tmp.path().join("Doom/aaa.exe"));
    write_exe(&tmp.path().join("Doom/doom.exe"));
    write_exe(&tmp.path().join("Doom/play.exe"));

    let pick = walker::pick_executable(&tmp.path().join("Doom"));
    assert_eq!(
        pick.selected.as_deref().and_then(Path::file_name),
        Some(std::ffi::OsStr::new("play.exe"))
    );
    assert_eq!(pick.passed_over.len(), 2);

    // Without a launch stem, the directory's own name wins over
    // listing order.
    let tmp2 = TempDir::new().unwrap();
    write_exe(&tmp2.path().join("Quake/aaa.exe"));
    write_exe(&tmp2.path().join("Quake/quake.exe"));
    let pick2 = walker::pick_executable(&tmp2.path().join("Quake"));
    assert_eq!(
        pick2.selected.as_deref().and_then(Path::file_name),
        Some(std::ffi::OsStr::new("quake.exe"))
    );
}

// ── Progress reporting ───────────────────────────────────────────────

#[test]
fn progress_counter_is_zero_based_and_finish_is_a_separate_message() {
    let tmp = TempDir::new().unwrap();
    write_exe(&tmp.path().join("Doom/doom.exe"));
    write_exe(&tmp.path().join("Quake/quake.exe"));

    let (tx, rx) = crossbeam_channel::unbounded();
    let libs = vec![library("Games", tmp.path())];
    Scanner::default().run(
        &ScanStrategy::Full,
        &libs,
        &[],
        &ExceptionSet::default(),
        &tx,
        &AtomicBool::new(false),
    );

    let mut total = 0;
    let mut done_values = Vec::new();
    let mut finished = false;
    for msg in rx.try_iter() {
        match msg {
            ScanProgress::LibraryStarted {
                directories_total, ..
            } => total = directories_total,
            ScanProgress::Update {
                directories_done, ..
            } => done_values.push(directories_done),
            ScanProgress::LibraryFinished { .. } => finished = true,
            _ => {}
        }
    }

    // Root + Doom + Quake.
    assert_eq!(total, 3);
    // One update per directory, sent before it is examined: the counter
    // covers 0..total and completion comes as its own message.
    assert_eq!(done_values, vec![0, 1, 2]);
    assert!(finished);
}

// ── Idempotence ──────────────────────────────────────────────────────

#[test]
fn full_scan_twice_yields_identical_catalog_and_exceptions() {
    let tmp = TempDir::new().unwrap();
    write_exe(&tmp.path().join("Doom/play.exe"));
    write_exe(&tmp.path().join("Doom/editor.exe"));
    write_exe(&tmp.path().join("Quake/quake.exe"));
    write_exe(&tmp.path().join("setup.exe"));

    let libs = vec![library("Games", tmp.path())];
    let first = run_pass(ScanStrategy::Full, &libs, &[], &ExceptionSet::default());
    let second = run_pass(ScanStrategy::Full, &libs, &first.catalog, &first.exceptions);

    assert_eq!(second.catalog, first.catalog);
    assert_eq!(second.exceptions, first.exceptions);
    assert!(second.report.games_added.is_empty());
    assert!(second.report.exceptions_added.is_empty());
}

// ── Exclusion pruning ────────────────────────────────────────────────

#[test]
fn folder_exception_prunes_the_subtree_entirely() {
    let tmp = TempDir::new().unwrap();
    write_exe(&tmp.path().join("Doom/play.exe"));
    // A large excluded subtree: none of it may be visited.
    for i in 0..40 {
        write_exe(&tmp.path().join(format!("tools/nested{i}/thing{i}.exe")));
    }

    let mut exceptions = ExceptionSet::default();
    assert!(exceptions.add("tools/"));

    let collected = walker::collect_directories(tmp.path(), walker::MAX_DEPTH, &exceptions);
    assert!(
        !collected.iter().any(|d| d.starts_with(tmp.path().join("tools"))),
        "walker descended into an excluded subtree"
    );
    // Root + Doom only — independent of the excluded subtree's size.
    assert_eq!(collected.len(), 2);

    let libs = vec![library("Games", tmp.path())];
    let outcome = run_pass(ScanStrategy::Full, &libs, &[], &exceptions);
    assert_eq!(outcome.report.directories_scanned, 2);
    assert_eq!(outcome.catalog.len(), 1);
    assert!(
        !outcome
            .exceptions
            .entries()
            .iter()
            .any(|e| e.starts_with("tools/") && e != "tools/"),
        "excluded files must not be documented individually"
    );
}

#[test]
fn excepted_selection_is_not_catalogued() {
    let tmp = TempDir::new().unwrap();
    write_exe(&tmp.path().join("Doom/doom.exe"));

    let mut exceptions = ExceptionSet::default();
    assert!(exceptions.add("Doom/doom.exe"));

    let libs = vec![library("Games", tmp.path())];
    let outcome = run_pass(ScanStrategy::Full, &libs, &[], &exceptions);
    assert!(outcome.catalog.is_empty());
}

// ── Strategies ───────────────────────────────────────────────────────

#[test]
fn incremental_scan_skips_directories_with_known_games() {
    let tmp = TempDir::new().unwrap();
    write_exe(&tmp.path().join("Doom/doom.exe"));
    let libs = vec![library("Games", tmp.path())];

    let first = run_pass(ScanStrategy::Full, &libs, &[], &ExceptionSet::default());
    assert_eq!(first.catalog.len(), 1);

    // A new stray lands in the known directory, and a new game appears
    // elsewhere. Incremental must not re-examine Doom/ (the stray would
    // otherwise become an exception entry) but must find Quake.
    write_exe(&tmp.path().join("Doom/stray.exe"));
    write_exe(&tmp.path().join("Quake/quake.exe"));

    let second = run_pass(
        ScanStrategy::Incremental,
        &libs,
        &first.catalog,
        &first.exceptions,
    );
    assert!(!second.exceptions.is_match("Doom/stray.exe"));
    assert_eq!(second.catalog.len(), 2);
    assert!(second.catalog.iter().any(|g| g.launch_path == "Quake/quake.exe"));
}

#[test]
fn targeted_scan_is_full_for_new_libraries_incremental_for_old() {
    let old = TempDir::new().unwrap();
    let new = TempDir::new().unwrap();
    write_exe(&old.path().join("Doom/doom.exe"));
    write_exe(&new.path().join("Myst/myst.exe"));
    let libs = vec![library("Old", old.path()), library("New", new.path())];

    let seeded = run_pass(
        ScanStrategy::Full,
        &[library("Old", old.path())],
        &[],
        &ExceptionSet::default(),
    );

    // Stray in the old library's known directory must stay unexamined;
    // the new library gets a full pass.
    write_exe(&old.path().join("Doom/stray.exe"));
    let outcome = run_pass(
        ScanStrategy::Targeted {
            new_libraries: vec!["New".into()],
        },
        &libs,
        &seeded.catalog,
        &seeded.exceptions,
    );

    assert!(!outcome.exceptions.is_match("Doom/stray.exe"));
    assert!(outcome.catalog.iter().any(|g| g.launch_path == "Myst/myst.exe"));
}

// ── Validation ───────────────────────────────────────────────────────

#[test]
fn missing_game_target_is_reported_never_deleted() {
    let tmp = TempDir::new().unwrap();
    write_exe(&tmp.path().join("Doom/doom.exe"));
    let libs = vec![library("Games", tmp.path())];
    let first = run_pass(ScanStrategy::Full, &libs, &[], &ExceptionSet::default());

    fs::remove_file(tmp.path().join("Doom/doom.exe")).unwrap();
    fs::remove_dir(tmp.path().join("Doom")).unwrap();

    let second = run_pass(ScanStrategy::Full, &libs, &first.catalog, &first.exceptions);
    assert_eq!(second.report.games_missing.len(), 1);
    assert_eq!(second.report.games_missing[0].title, "Doom");
    assert_eq!(second.report.games_valid, 0);
    // The record survives for the relocation prompt.
    assert!(second.catalog.iter().any(|g| g.launch_path == "Doom/doom.exe"));
}

#[test]
fn missing_library_root_is_reported_distinctly_and_games_kept() {
    let present = TempDir::new().unwrap();
    write_exe(&present.path().join("Quake/quake.exe"));

    let gone = PathBuf::from("/nonexistent/gamescout-missing-root");
    let libs = vec![library("Gone", &gone), library("Here", present.path())];
    let catalog = vec![Game::discovered(
        "Doom".into(),
        "Doom/doom.exe".into(),
        "Gone".into(),
    )];

    let outcome = run_pass(ScanStrategy::Full, &libs, &catalog, &ExceptionSet::default());
    assert_eq!(outcome.report.libraries_missing, vec!["Gone".to_string()]);
    // Not double-reported as a per-game validation failure.
    assert!(outcome.report.games_missing.is_empty());
    assert_eq!(outcome.report.games_valid, 0);
    assert!(outcome.catalog.iter().any(|g| g.title == "Doom"));
    assert!(outcome.catalog.iter().any(|g| g.launch_path == "Quake/quake.exe"));
}

#[test]
fn converted_manual_game_is_left_alone_by_scans() {
    let tmp = TempDir::new().unwrap();
    let elsewhere = TempDir::new().unwrap();
    write_exe(&elsewhere.path().join("doom.exe"));

    let libs = vec![library("Games", tmp.path())];
    let mut game = Game::discovered("Doom".into(), "Doom/doom.exe".into(), "Games".into());
    game.make_manual(elsewhere.path().join("doom.exe").display().to_string());

    let outcome = run_pass(ScanStrategy::Full, &libs, &[game.clone()], &ExceptionSet::default());
    let kept = outcome.catalog.iter().find(|g| g.title == "Doom").unwrap();
    assert_eq!(kept.library_name, "");
    assert_eq!(kept.launch_path, game.launch_path);
    assert!(outcome.report.games_missing.is_empty());
}

// ── Failure handling ─────────────────────────────────────────────────

#[cfg(unix)]
#[test]
fn unreadable_directory_is_skipped_not_fatal() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = TempDir::new().unwrap();
    write_exe(&tmp.path().join("Doom/doom.exe"));
    let locked = tmp.path().join("Locked");
    fs::create_dir(&locked).unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
    if fs::read_dir(&locked).is_ok() {
        // Privileged user (e.g. CI running as root) — permissions are
        // not enforced, so the scenario cannot be reproduced.
        return;
    }

    let libs = vec![library("Games", tmp.path())];
    let outcome = run_pass(ScanStrategy::Full, &libs, &[], &ExceptionSet::default());

    // Restore so TempDir can clean up.
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    assert!(!outcome.cancelled);
    assert_eq!(outcome.catalog.len(), 1);
    assert!(outcome
        .report
        .skipped
        .iter()
        .any(|s| s.path.contains("Locked")));
}

// ── Cancellation ─────────────────────────────────────────────────────

#[test]
fn cancel_before_start_leaves_catalog_untouched() {
    let tmp = TempDir::new().unwrap();
    write_exe(&tmp.path().join("Doom/doom.exe"));
    let libs = vec![library("Games", tmp.path())];

    let (tx, _rx) = crossbeam_channel::unbounded();
    let cancel = AtomicBool::new(true);
    let catalog = vec![Game::discovered("Old".into(), "Old/old.exe".into(), "Games".into())];
    let outcome = Scanner::default().run(
        &ScanStrategy::Full,
        &libs,
        &catalog,
        &ExceptionSet::default(),
        &tx,
        &cancel,
    );

    assert!(outcome.cancelled);
    assert_eq!(outcome.catalog, catalog);
}

/// Cancelling mid-way through library B of a two-library scan keeps
/// library A's committed results and none of B's.
///
/// Determinism: library B holds far more directories than the bounded
/// progress channel's capacity. The test stops draining once it sees
/// B's `LibraryStarted`, so the worker blocks on a full channel inside
/// B, the cancel flag is set, and the next directory checkpoint
/// observes it — B can never complete first.
#[test]
fn cancellation_discards_only_the_in_progress_library() {
    let lib_a = TempDir::new().unwrap();
    let lib_b = TempDir::new().unwrap();
    write_exe(&lib_a.path().join("Doom/doom.exe"));
    write_exe(&lib_b.path().join("Quake/quake.exe"));
    for i in 0..600 {
        fs::create_dir_all(lib_b.path().join(format!("filler{i:03}"))).unwrap();
    }

    let libraries = vec![library("A", lib_a.path()), library("B", lib_b.path())];
    let handle = start_scan(
        ScanStrategy::Full,
        libraries,
        Vec::new(),
        ExceptionSet::default(),
    );

    let deadline = std::time::Instant::now() + Duration::from_secs(30);
    loop {
        assert!(
            std::time::Instant::now() < deadline,
            "library B never started within 30 s"
        );
        match handle.progress_rx.recv_timeout(Duration::from_millis(50)) {
            Ok(ScanProgress::LibraryStarted { library, .. }) if library == "B" => break,
            Ok(_) => continue,
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => continue,
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => {
                panic!("scanner finished before library B started")
            }
        }
    }
    handle.cancel();
    let outcome = handle.join();

    assert!(outcome.cancelled);
    assert!(
        outcome.catalog.iter().any(|g| g.library_name == "A"),
        "library A's committed pass must be retained"
    );
    assert!(
        !outcome.catalog.iter().any(|g| g.library_name == "B"),
        "library B's partial pass must be discarded"
    );
}
