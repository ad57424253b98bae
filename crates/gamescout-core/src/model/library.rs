/// A configured library root — a directory that is auto-scanned for games.
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One configured scan root.
///
/// Names are unique within a configuration; they key the
/// library-relative paths stored on games.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Library {
    pub name: String,
    pub path: PathBuf,
}

impl Library {
    /// Derive a display name for a new library from its folder name,
    /// disambiguating collisions against `existing` with a numeric
    /// suffix (`Games`, `Games (2)`, ...).
    pub fn derive_name(root: &Path, existing: &[Library]) -> String {
        let base = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Library".to_string());

        let taken = |candidate: &str| existing.iter().any(|l| l.name == candidate);
        if !taken(&base) {
            return base;
        }
        let mut n = 2u32;
        loop {
            let candidate = format!("{base} ({n})");
            if !taken(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_name_uses_folder_name() {
        assert_eq!(Library::derive_name(Path::new("/srv/Games"), &[]), "Games");
    }

    #[test]
    fn derive_name_disambiguates_collisions() {
        let existing = vec![
            Library {
                name: "Games".into(),
                path: PathBuf::from("/a/Games"),
            },
            Library {
                name: "Games (2)".into(),
                path: PathBuf::from("/b/Games"),
            },
        ];
        assert_eq!(
            Library::derive_name(Path::new("/c/Games"), &existing),
            "Games (3)"
        );
    }
}
