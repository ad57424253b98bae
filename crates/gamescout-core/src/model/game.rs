/// The `Game` record — one launchable entry in the catalog.
///
/// A game is either *library-managed* (discovered by a scan, carrying a
/// library-relative `launch_path` plus the owning library's name) or
/// *manual* (entered by the user, carrying an absolute path or URL and an
/// empty `library_name`). Converting a library-managed game to manual is
/// a one-way transition: once the library association is cleared the
/// scanner treats the record as user-owned and never re-associates it.
use crate::model::Library;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Platforms a game can run on.
///
/// Serialised as the display strings used in `games.json`
/// (`"Windows"`, `"macOS"`, `"Linux"`, `"Web"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Platform {
    Windows,
    #[serde(rename = "macOS")]
    MacOs,
    Linux,
    Web,
}

impl Platform {
    /// The platform the current process is running on.
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Linux
        }
    }
}

/// Where launching a game actually points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchTarget {
    /// A web game — handed to the system URL opener.
    Url(String),
    /// A file on disk, fully resolved.
    Executable(PathBuf),
}

/// One catalog entry.
///
/// `genre`, `developer`, and `year` use the empty string (never a null)
/// to mean "Unknown"; the presentation layer substitutes the label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub title: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub developer: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub platforms: Vec<Platform>,
    #[serde(default)]
    pub launch_path: String,
    /// Empty string means the game is not library-managed.
    #[serde(default)]
    pub library_name: String,
}

impl Game {
    /// Create a library-managed game discovered by a scan.
    pub fn discovered(title: String, relative_path: String, library_name: String) -> Self {
        Self {
            title,
            genre: String::new(),
            developer: String::new(),
            year: String::new(),
            platforms: vec![Platform::current()],
            launch_path: relative_path,
            library_name,
        }
    }

    /// `true` if the launch path is an HTTP(S) URL.
    pub fn is_web(&self) -> bool {
        self.launch_path.starts_with("http://") || self.launch_path.starts_with("https://")
    }

    /// `true` if this game is tied to a configured library.
    pub fn is_library_managed(&self) -> bool {
        !self.library_name.is_empty() && !self.is_web()
    }

    /// `true` if this game is user-managed (absolute path or URL).
    pub fn is_manual(&self) -> bool {
        !self.is_library_managed()
    }

    /// Convert to a manual game with a new launch target.
    ///
    /// Clears the library association. This is deliberately one-way:
    /// there is no operation that restores `library_name` on an existing
    /// record, and scans never re-claim a manual game.
    pub fn make_manual(&mut self, target: String) {
        self.launch_path = paths::normalize(&target);
        self.library_name = String::new();
    }

    /// Record a platform on this game if not already present.
    pub fn add_platform(&mut self, platform: Platform) {
        if !self.platforms.contains(&platform) {
            self.platforms.push(platform);
        }
    }

    /// Resolve the launch target against the configured libraries.
    ///
    /// Returns `None` for a library-managed game whose library has been
    /// removed from the configuration.
    pub fn resolve_target(&self, libraries: &[Library]) -> Option<LaunchTarget> {
        if self.is_web() {
            return Some(LaunchTarget::Url(self.launch_path.clone()));
        }
        if self.is_manual() {
            return Some(LaunchTarget::Executable(PathBuf::from(&self.launch_path)));
        }
        paths::to_absolute(&self.launch_path, &self.library_name, libraries)
            .map(LaunchTarget::Executable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_serialises_to_display_strings() {
        let json = serde_json::to_string(&vec![
            Platform::Windows,
            Platform::MacOs,
            Platform::Linux,
            Platform::Web,
        ])
        .unwrap();
        assert_eq!(json, r#"["Windows","macOS","Linux","Web"]"#);
    }

    #[test]
    fn make_manual_clears_library_and_stays_manual() {
        let mut game = Game::discovered(
            "Doom".into(),
            "Doom/doom.exe".into(),
            "Games".into(),
        );
        assert!(game.is_library_managed());

        game.make_manual("D:\\Standalone\\doom.exe".into());
        assert!(game.is_manual());
        assert_eq!(game.library_name, "");
        assert_eq!(game.launch_path, "D:/Standalone/doom.exe");
    }

    #[test]
    fn web_games_resolve_to_url() {
        let mut game = Game::discovered("Wordle".into(), String::new(), String::new());
        game.launch_path = "https://example.com/wordle".into();
        game.platforms = vec![Platform::Web];
        assert!(game.is_web());
        assert_eq!(
            game.resolve_target(&[]),
            Some(LaunchTarget::Url("https://example.com/wordle".into()))
        );
    }

    #[test]
    fn library_game_with_removed_library_does_not_resolve() {
        let game = Game::discovered("Doom".into(), "Doom/doom.exe".into(), "Gone".into());
        assert_eq!(game.resolve_target(&[]), None);
    }
}
