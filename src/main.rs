//! GameScout — game library cataloguer.
//!
//! Thin binary entry point. All engine logic lives in the
//! `gamescout-core` crate; this front end wires a command line onto the
//! catalog store and scan orchestrator.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use gamescout_core::scanner::{start_scan, ScanProgress, ScanStrategy};
use gamescout_core::store::CatalogStore;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gamescout", version, about = "Catalogue game libraries on disk")]
struct Cli {
    /// Override the configuration file location.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the catalog file location.
    #[arg(long, global = true)]
    games: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan configured libraries and update the catalog.
    Scan {
        /// Rescan everything, including directories with known games.
        #[arg(long)]
        full: bool,
        /// Restrict the full pass to these libraries; the rest get an
        /// incremental pass.
        #[arg(long = "new", value_name = "LIBRARY")]
        new_libraries: Vec<String>,
    },
    /// Print the catalog.
    List,
    /// Configure a new library root.
    AddLibrary { root: PathBuf },
    /// Remove a library and every game it manages.
    RemoveLibrary { name: String },
    /// List persisted exception entries.
    Exceptions,
    /// Add an exception entry (end folder entries with a slash).
    Except { entry: String },
    /// Remove an exception entry.
    Unexcept { entry: String },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let cli = Cli::parse();
    let mut store = match (cli.config, cli.games) {
        (Some(config), Some(games)) => CatalogStore::open(config, games),
        (None, None) => CatalogStore::open_default().context("cannot locate application files")?,
        _ => bail!("--config and --games must be given together"),
    };

    match cli.command {
        Command::Scan {
            full,
            new_libraries,
        } => run_scan(&mut store, full, new_libraries)?,
        Command::List => {
            for game in store.games() {
                let origin = if game.is_library_managed() {
                    game.library_name.as_str()
                } else {
                    "manual"
                };
                println!("{}\t[{origin}]\t{}", game.title, game.launch_path);
            }
        }
        Command::AddLibrary { root } => {
            let name = store.add_library(&root)?;
            store.save()?;
            println!("library added: {name}");
        }
        Command::RemoveLibrary { name } => {
            if store.remove_library(&name)? {
                store.save()?;
                println!("library removed: {name}");
            } else {
                bail!("no configured library named {name}");
            }
        }
        Command::Exceptions => {
            for entry in store.exceptions().entries() {
                println!("{entry}");
            }
        }
        Command::Except { entry } => {
            if store.add_exception_entry(&entry)? {
                store.save()?;
            } else {
                println!("already covered: {entry}");
            }
        }
        Command::Unexcept { entry } => {
            if store.remove_exception_entry(&entry)? {
                store.save()?;
            } else {
                bail!("no such exception entry: {entry}");
            }
        }
    }

    Ok(())
}

fn run_scan(
    store: &mut CatalogStore,
    full: bool,
    new_libraries: Vec<String>,
) -> anyhow::Result<()> {
    if store.libraries().is_empty() {
        bail!("no libraries configured; run `gamescout add-library <root>` first");
    }
    let strategy = if !new_libraries.is_empty() {
        ScanStrategy::Targeted { new_libraries }
    } else if full {
        ScanStrategy::Full
    } else {
        ScanStrategy::Incremental
    };

    if !store.begin_scan() {
        bail!("a scan is already in progress");
    }
    let (libraries, catalog, exceptions) = store.scan_snapshot();
    let handle = start_scan(strategy, libraries, catalog, exceptions);

    for progress in handle.progress_rx.iter() {
        match progress {
            ScanProgress::LibraryStarted {
                library,
                directories_total,
            } => println!("scanning {library} ({directories_total} directories)"),
            ScanProgress::Update { .. } => {}
            ScanProgress::Skipped { path, message } => {
                eprintln!("skipped {path}: {message}");
            }
            ScanProgress::LibraryFinished {
                library,
                games_found,
            } => println!("{library}: {games_found} new games"),
            ScanProgress::Complete | ScanProgress::Cancelled => break,
        }
    }

    let outcome = handle.join();
    store.finish_scan();

    let report = &outcome.report;
    println!(
        "{} added, {} missing, {} auto-excluded, {} directories scanned",
        report.games_added.len(),
        report.games_missing.len(),
        report.exceptions_added.len(),
        report.directories_scanned,
    );
    for missing in &report.games_missing {
        println!("missing: {} (expected {})", missing.title, missing.expected_path);
    }
    for library in &report.libraries_missing {
        println!("library root unreachable: {library}");
    }
    if outcome.cancelled {
        println!("scan cancelled; partial results from finished libraries kept");
    }

    store.apply_scan_outcome(outcome);
    store.save()?;
    Ok(())
}
