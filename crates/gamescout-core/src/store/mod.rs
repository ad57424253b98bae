/// Catalog store — the single owner of configuration and catalog state.
///
/// Explicitly constructed and passed by reference to every consumer;
/// there is no ambient global. Load falls back to defaults on missing
/// or malformed files, save is write-temp-then-rename, and all
/// in-memory mutations are separate from persistence — a scan batches
/// its whole result into one `save`.
///
/// `games.json` lives beside the executable so a catalog can be copied
/// between machines; `config.json` lives in the platform's per-user
/// configuration directory.
pub mod config;

pub use config::{Config, SavedState, CONFIG_VERSION};

use crate::exceptions::ExceptionSet;
use crate::model::{validate, FieldError, Game, Library};
use crate::paths;
use crate::scanner::ScanOutcome;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{info, warn};

/// Directory name under the per-user config root.
pub const APP_DIR_NAME: &str = "GameScout";
/// Per-user configuration file name.
pub const CONFIG_FILE: &str = "config.json";
/// Portable catalog file name, stored beside the executable.
pub const GAMES_FILE: &str = "games.json";

/// Persistence and mutation-guard failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("atomic replace failed: {0}")]
    Persist(#[from] tempfile::PersistError),
    #[error("a scan is in progress; the catalog is read-only")]
    ScanInProgress,
    #[error(transparent)]
    Field(#[from] FieldError),
    #[error("no configured library named {0}")]
    UnknownLibrary(String),
    #[error("library root is not a directory: {0}")]
    NotADirectory(String),
    #[error("cannot determine application directories")]
    NoAppDir,
}

/// In-memory catalog plus configuration, with explicit load/save.
pub struct CatalogStore {
    config: Config,
    games: Vec<Game>,
    config_path: PathBuf,
    games_path: PathBuf,
    first_run: bool,
    scan_active: bool,
}

impl CatalogStore {
    /// Open the store at the platform-default locations.
    pub fn open_default() -> Result<Self, StoreError> {
        let config_dir = dirs::config_dir().ok_or(StoreError::NoAppDir)?;
        let exe_dir = std::env::current_exe()?
            .parent()
            .map(Path::to_path_buf)
            .ok_or(StoreError::NoAppDir)?;
        Ok(Self::open(
            config_dir.join(APP_DIR_NAME).join(CONFIG_FILE),
            exe_dir.join(GAMES_FILE),
        ))
    }

    /// Open the store against explicit file locations (tests, portable
    /// installs).
    ///
    /// Missing or malformed files fall back to defaults without
    /// surfacing an error; the first-run indicator is set when the
    /// configuration file was absent.
    pub fn open(config_path: PathBuf, games_path: PathBuf) -> Self {
        let first_run = !config_path.exists();
        let config: Config = load_json(&config_path).unwrap_or_default();
        let games: Vec<Game> = load_json(&games_path).unwrap_or_default();
        info!(
            "catalog store opened: {} games, {} libraries, {} exceptions{}",
            games.len(),
            config.libraries.len(),
            config.exceptions.len(),
            if first_run { " (first run)" } else { "" }
        );
        Self {
            config,
            games,
            config_path,
            games_path,
            first_run,
            scan_active: false,
        }
    }

    /// Persist configuration and catalog.
    ///
    /// Each file is written to a temporary sibling and renamed into
    /// place, so a crash mid-write leaves the previous valid file
    /// intact.
    pub fn save(&self) -> Result<(), StoreError> {
        let mut config = self.config.clone();
        config.version = CONFIG_VERSION;
        write_json_atomic(&self.config_path, &config)?;
        write_json_atomic(&self.games_path, &self.games)?;
        Ok(())
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn is_first_run(&self) -> bool {
        self.first_run
    }

    pub fn games(&self) -> &[Game] {
        &self.games
    }

    pub fn libraries(&self) -> &[Library] {
        &self.config.libraries
    }

    pub fn exceptions(&self) -> &ExceptionSet {
        &self.config.exceptions
    }

    pub fn saved_state(&self) -> &SavedState {
        &self.config.saved_state
    }

    pub fn saved_state_mut(&mut self) -> &mut SavedState {
        &mut self.config.saved_state
    }

    // ── Scan coordination ────────────────────────────────────────────

    /// Mark a scan as running. Returns `false` if one already is —
    /// only a single worker may hold the catalog at a time.
    pub fn begin_scan(&mut self) -> bool {
        if self.scan_active {
            return false;
        }
        self.scan_active = true;
        true
    }

    pub fn finish_scan(&mut self) {
        self.scan_active = false;
    }

    pub fn scan_active(&self) -> bool {
        self.scan_active
    }

    /// Snapshot the state a scan worker needs. The worker owns the
    /// copies; the store stays usable (read-only) while it runs.
    pub fn scan_snapshot(&self) -> (Vec<Library>, Vec<Game>, ExceptionSet) {
        (
            self.config.libraries.clone(),
            self.games.clone(),
            self.config.exceptions.clone(),
        )
    }

    /// Install a completed (or deliberately merged partial) scan
    /// outcome. Persistence remains a separate, explicit `save`.
    pub fn apply_scan_outcome(&mut self, outcome: ScanOutcome) {
        self.games = outcome.catalog;
        self.config.exceptions = outcome.exceptions;
    }

    // ── Libraries ────────────────────────────────────────────────────

    /// Configure a new library root, deriving a unique display name
    /// from its folder name. Adding an already-configured root returns
    /// the existing name.
    pub fn add_library(&mut self, root: &Path) -> Result<String, StoreError> {
        self.guard_mutation()?;
        if !root.is_dir() {
            return Err(StoreError::NotADirectory(root.display().to_string()));
        }
        if let Some(existing) = self
            .config
            .libraries
            .iter()
            .find(|l| paths::normalize_path(&l.path) == paths::normalize_path(root))
        {
            return Ok(existing.name.clone());
        }
        let name = Library::derive_name(root, &self.config.libraries);
        self.config.libraries.push(Library {
            name: name.clone(),
            path: root.to_path_buf(),
        });
        info!("library added: {name} ({})", root.display());
        Ok(name)
    }

    /// Remove a library and every game it manages (cascading delete).
    pub fn remove_library(&mut self, name: &str) -> Result<bool, StoreError> {
        self.guard_mutation()?;
        let before = self.config.libraries.len();
        self.config.libraries.retain(|l| l.name != name);
        if self.config.libraries.len() == before {
            return Ok(false);
        }
        let games_before = self.games.len();
        self.games
            .retain(|g| !(g.is_library_managed() && g.library_name == name));
        info!(
            "library removed: {name} ({} games cascaded)",
            games_before - self.games.len()
        );
        Ok(true)
    }

    // ── Exceptions ───────────────────────────────────────────────────

    /// Add a persisted exception entry. Returns whether it was inserted
    /// (duplicates and folder-covered entries are no-ops).
    pub fn add_exception_entry(&mut self, entry: &str) -> Result<bool, StoreError> {
        self.guard_mutation()?;
        Ok(self.config.exceptions.add(entry))
    }

    pub fn remove_exception_entry(&mut self, entry: &str) -> Result<bool, StoreError> {
        self.guard_mutation()?;
        Ok(self.config.exceptions.remove(entry))
    }

    // ── Games ────────────────────────────────────────────────────────

    /// Insert or replace a game, keyed by library name plus launch
    /// path. Library-relative paths are only unique within a library,
    /// so two libraries with the same internal layout stay distinct;
    /// manual games carry the empty library name and absolute paths.
    /// Field validation rejects bad input here rather than letting it
    /// into the catalog.
    pub fn upsert_game(&mut self, game: Game) -> Result<(), StoreError> {
        self.guard_mutation()?;
        validate::validate_title(&game.title)?;
        validate::validate_year(&game.year)?;
        if game.is_web() {
            validate::validate_url(&game.launch_path)?;
        } else if game.launch_path.trim().is_empty() {
            return Err(FieldError::EmptyPath.into());
        }
        match self
            .games
            .iter_mut()
            .find(|g| g.library_name == game.library_name && g.launch_path == game.launch_path)
        {
            Some(existing) => *existing = game,
            None => self.games.push(game),
        }
        Ok(())
    }

    /// Remove a game. `library_name` is empty for manual games. Returns
    /// whether it was present.
    pub fn remove_game(
        &mut self,
        library_name: &str,
        launch_path: &str,
    ) -> Result<bool, StoreError> {
        self.guard_mutation()?;
        let target = paths::normalize(launch_path);
        let before = self.games.len();
        self.games
            .retain(|g| !(g.library_name == library_name && g.launch_path == target));
        Ok(self.games.len() != before)
    }

    /// Change a game's launch target.
    ///
    /// For a library-managed game this is the one-way conversion to
    /// manual: the library association is cleared and never restored.
    pub fn set_launch_target(
        &mut self,
        library_name: &str,
        current_launch_path: &str,
        new_target: &str,
    ) -> Result<bool, StoreError> {
        self.guard_mutation()?;
        let new_target = new_target.trim();
        if new_target.is_empty() {
            return Err(FieldError::EmptyPath.into());
        }
        if new_target.starts_with("http://") || new_target.starts_with("https://") {
            validate::validate_url(new_target)?;
        }
        let Some(game) = self.find_game_mut(library_name, current_launch_path) else {
            return Ok(false);
        };
        game.make_manual(new_target.to_string());
        Ok(true)
    }

    /// Point a missing game at a new absolute location.
    ///
    /// When the new path falls inside a configured library the game
    /// stays (or becomes) library-managed under that library; otherwise
    /// it converts to manual.
    pub fn relocate_game(
        &mut self,
        library_name: &str,
        current_launch_path: &str,
        new_path: &Path,
    ) -> Result<bool, StoreError> {
        self.guard_mutation()?;
        let resolved = paths::to_library_relative(new_path, &self.config.libraries);
        let Some(game) = self.find_game_mut(library_name, current_launch_path) else {
            return Ok(false);
        };
        match resolved {
            Some((rel, library)) => {
                game.launch_path = rel;
                game.library_name = library;
            }
            None => game.make_manual(paths::normalize_path(new_path)),
        }
        Ok(true)
    }

    fn find_game_mut(&mut self, library_name: &str, launch_path: &str) -> Option<&mut Game> {
        let target = paths::normalize(launch_path);
        self.games
            .iter_mut()
            .find(|g| g.library_name == library_name && g.launch_path == target)
    }

    fn guard_mutation(&self) -> Result<(), StoreError> {
        if self.scan_active {
            return Err(StoreError::ScanInProgress);
        }
        Ok(())
    }
}

/// Read and parse a JSON file, returning `None` (with a warning for
/// corrupt content) when it cannot be used.
fn load_json<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            if err.kind() != std::io::ErrorKind::NotFound {
                warn!("cannot read {}: {err}", path.display());
            }
            return None;
        }
    };
    match serde_json::from_str(&text) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!("malformed {} — using defaults: {err}", path.display());
            None
        }
    }
}

/// Serialise `value` to a temporary file in the destination directory,
/// then rename over the target.
fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&dir)?;
    let mut tmp = NamedTempFile::new_in(&dir)?;
    serde_json::to_writer_pretty(&mut tmp, value)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;
    Ok(())
}
