/// Path normalisation and library-relative ⇄ absolute conversion.
///
/// All paths entering the catalog are stored in a single separator
/// convention (forward slashes) so a `games.json` written on Windows
/// loads unchanged on macOS or Linux. Conversion between absolute
/// filesystem paths and library-relative catalog paths happens here and
/// nowhere else.
use crate::model::Library;
use std::path::{Path, PathBuf};

/// Normalise a path string: backslashes become forward slashes and
/// surrounding whitespace is stripped.
///
/// Idempotent — `normalize(normalize(p)) == normalize(p)`.
pub fn normalize(path: &str) -> String {
    path.trim().replace('\\', "/")
}

/// Normalise a filesystem path into the catalog's string form.
pub fn normalize_path(path: &Path) -> String {
    normalize(&path.to_string_lossy())
}

/// Convert an absolute path to a library-relative one.
///
/// Returns the path relative to whichever configured library root is a
/// prefix of it, together with that library's name. When roots nest, the
/// most specific (longest) matching root wins, which keeps resolution
/// deterministic.
///
/// Returns `None` if no configured library contains the path.
pub fn to_library_relative(absolute: &Path, libraries: &[Library]) -> Option<(String, String)> {
    let abs = normalize_path(absolute);

    let mut best: Option<(&Library, usize)> = None;
    for lib in libraries {
        let root = normalize_path(&lib.path);
        let root = root.trim_end_matches('/');
        if abs == root || (abs.starts_with(root) && abs.as_bytes().get(root.len()) == Some(&b'/'))
        {
            match best {
                Some((_, len)) if len >= root.len() => {}
                _ => best = Some((lib, root.len())),
            }
        }
    }

    let (lib, root_len) = best?;
    let rel = abs[root_len..].trim_start_matches('/').to_string();
    Some((rel, lib.name.clone()))
}

/// Resolve a library-relative path against the named library's root.
///
/// Returns `None` if no library with that name is currently configured
/// (the library was removed after the game was catalogued).
pub fn to_absolute(relative: &str, library_name: &str, libraries: &[Library]) -> Option<PathBuf> {
    let lib = libraries.iter().find(|l| l.name == library_name)?;
    let mut path = lib.path.clone();
    for segment in normalize(relative).split('/').filter(|s| !s.is_empty()) {
        path.push(segment);
    }
    Some(path)
}

/// Relative form of `path` under `root`, in normalised string form.
///
/// Used by the walker to express discovered entries relative to the
/// library root currently being scanned. Returns `None` when `path`
/// does not live under `root`.
pub fn relative_to(path: &Path, root: &Path) -> Option<String> {
    let abs = normalize_path(path);
    let root = normalize_path(root);
    let root = root.trim_end_matches('/');
    if abs == root {
        return Some(String::new());
    }
    if abs.starts_with(root) && abs.as_bytes().get(root.len()) == Some(&b'/') {
        Some(abs[root.len() + 1..].to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lib(name: &str, path: &str) -> Library {
        Library {
            name: name.to_string(),
            path: PathBuf::from(path),
        }
    }

    #[test]
    fn normalize_converts_separators_and_trims() {
        assert_eq!(normalize("  C:\\Games\\Doom  "), "C:/Games/Doom");
        assert_eq!(normalize("already/fine"), "already/fine");
    }

    #[test]
    fn normalize_is_idempotent() {
        let once = normalize("C:\\Games\\Doom ");
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn relative_resolution_roundtrip() {
        let libs = vec![lib("Games", "/srv/games")];
        let (rel, name) =
            to_library_relative(Path::new("/srv/games/Doom/doom.exe"), &libs).unwrap();
        assert_eq!(rel, "Doom/doom.exe");
        assert_eq!(name, "Games");

        let abs = to_absolute(&rel, &name, &libs).unwrap();
        assert_eq!(abs, PathBuf::from("/srv/games/Doom/doom.exe"));
    }

    #[test]
    fn nested_roots_prefer_longest_match() {
        let libs = vec![lib("Outer", "/srv/games"), lib("Inner", "/srv/games/retro")];
        let (rel, name) =
            to_library_relative(Path::new("/srv/games/retro/pacman/pacman.exe"), &libs).unwrap();
        assert_eq!(name, "Inner");
        assert_eq!(rel, "pacman/pacman.exe");
    }

    #[test]
    fn sibling_prefix_does_not_match() {
        // "/srv/games2" must not resolve against the "/srv/games" root.
        let libs = vec![lib("Games", "/srv/games")];
        assert!(to_library_relative(Path::new("/srv/games2/doom.exe"), &libs).is_none());
    }

    #[test]
    fn to_absolute_none_for_removed_library() {
        let libs = vec![lib("Games", "/srv/games")];
        assert!(to_absolute("Doom/doom.exe", "Gone", &libs).is_none());
    }

    #[test]
    fn relative_to_is_segment_safe() {
        assert_eq!(
            relative_to(Path::new("/srv/games/Doom"), Path::new("/srv/games")),
            Some("Doom".to_string())
        );
        assert_eq!(
            relative_to(Path::new("/srv/games2/Doom"), Path::new("/srv/games")),
            None
        );
    }
}
