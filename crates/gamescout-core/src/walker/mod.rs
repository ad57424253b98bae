/// Depth-limited directory traversal and executable selection.
///
/// The walker produces a deterministic, restartable sequence of
/// directories for a library root (entries are visited in name order,
/// not OS listing order) and, within a directory, picks the single
/// executable most likely to be the game. Folder exceptions prune the
/// walk — an excluded subtree is never descended into, so a `build/`
/// directory with thousands of files costs nothing.
use crate::exceptions::{ExceptionSet, LAUNCH_STEMS};
use crate::paths;
use crate::platform;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default traversal depth cap below a library root.
pub const MAX_DEPTH: usize = 10;

/// Everything the scanner needs to know about one directory's
/// executables: the chosen candidate plus every candidate passed over
/// (reported upward as file-exception candidates, never dropped).
#[derive(Debug, Default)]
pub struct DirectoryPick {
    pub selected: Option<PathBuf>,
    pub passed_over: Vec<PathBuf>,
}

/// Game metadata inferred from a launch path's position in the library.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InferredMetadata {
    pub title: String,
    pub genre: String,
    pub developer: String,
}

/// Collect every directory to examine under `root`, in a deterministic
/// order, pruning excluded subtrees.
///
/// The root itself is always first (a library can carry root-level
/// executables). Subdirectories are included down to `max_depth` levels
/// below the root; hidden entries and symlinks are skipped; a directory
/// whose library-relative path matches a folder exception is omitted
/// and not recursed into.
///
/// Used up front purely to size the progress indicator — the scanner
/// re-reads each directory when it visits it.
pub fn collect_directories(
    root: &Path,
    max_depth: usize,
    exceptions: &ExceptionSet,
) -> Vec<PathBuf> {
    let mut out = vec![root.to_path_buf()];
    collect_into(root, root, 1, max_depth, exceptions, &mut out);
    out
}

fn collect_into(
    root: &Path,
    dir: &Path,
    depth: usize,
    max_depth: usize,
    exceptions: &ExceptionSet,
    out: &mut Vec<PathBuf>,
) {
    if depth > max_depth {
        return;
    }
    for entry in sorted_entries(dir) {
        let path = entry.path();
        let Ok(meta) = fs::symlink_metadata(&path) else {
            continue;
        };
        if meta.is_symlink() || !meta.is_dir() || is_hidden(&path) {
            continue;
        }
        if platform::is_opaque_bundle(&path) {
            continue;
        }
        if let Some(rel) = paths::relative_to(&path, root) {
            if exceptions.is_match(&rel) {
                debug!("pruning excluded directory {rel}");
                continue;
            }
        }
        out.push(path.clone());
        collect_into(root, &path, depth + 1, max_depth, exceptions, out);
    }
}

/// Select the launchable executable for one directory.
///
/// Candidates are the directory's direct entries that pass the
/// platform's executable check, in name order. Priority:
///
/// 1. a stem equal (case-insensitively) to `game`, `launch`, or `play`;
/// 2. a stem equal to the directory's own name;
/// 3. the first candidate in order.
///
/// Ties within a tier resolve by order. Unreadable entries are treated
/// as non-candidates.
pub fn pick_executable(dir: &Path) -> DirectoryPick {
    let dir_stem = dir
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let mut candidates: Vec<PathBuf> = Vec::new();
    for entry in sorted_entries(dir) {
        let path = entry.path();
        if is_hidden(&path) {
            continue;
        }
        let Ok(meta) = fs::symlink_metadata(&path) else {
            continue;
        };
        if meta.is_symlink() {
            continue;
        }
        if platform::is_executable_candidate(&path, &meta) {
            candidates.push(path);
        }
    }

    if candidates.is_empty() {
        return DirectoryPick::default();
    }

    let stem_of = |p: &Path| {
        p.file_stem()
            .map(|s| s.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    };

    let selected_idx = candidates
        .iter()
        .position(|c| LAUNCH_STEMS.contains(&stem_of(c).as_str()))
        .or_else(|| candidates.iter().position(|c| stem_of(c) == dir_stem))
        .unwrap_or(0);

    let selected = candidates.remove(selected_idx);
    DirectoryPick {
        selected: Some(selected),
        passed_over: candidates,
    }
}

/// Infer title, developer, and genre from a library-relative launch
/// path, based on how deep the executable sits below the root:
///
/// - depth 0 (root-level file): title from the filename;
/// - depth 1: title from the parent directory;
/// - depth 2: developer from the grandparent, title from the parent;
/// - depth 3+: genre from the topmost intermediate directory, developer
///   from the next, title from the immediate parent.
///
/// Fields not determined by depth stay empty ("Unknown").
pub fn infer_metadata(relative_path: &str) -> InferredMetadata {
    let rel = paths::normalize(relative_path);
    let segments: Vec<&str> = rel.split('/').filter(|s| !s.is_empty()).collect();
    let mut meta = InferredMetadata::default();

    match segments.len() {
        0 => {}
        1 => {
            meta.title = file_stem_of(segments[0]);
        }
        2 => {
            meta.title = segments[0].to_string();
        }
        3 => {
            meta.developer = segments[0].to_string();
            meta.title = segments[1].to_string();
        }
        n => {
            meta.genre = segments[0].to_string();
            meta.developer = segments[1].to_string();
            meta.title = segments[n - 2].to_string();
        }
    }
    meta
}

fn file_stem_of(name: &str) -> String {
    Path::new(name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string())
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}

/// Directory entries in name order. Read failures (permission denied,
/// transient I/O) yield an empty list — the caller records the skip.
fn sorted_entries(dir: &Path) -> Vec<fs::DirEntry> {
    let mut entries: Vec<fs::DirEntry> = match fs::read_dir(dir) {
        Ok(iter) => iter.flatten().collect(),
        Err(err) => {
            debug!("cannot read {}: {err}", dir.display());
            return Vec::new();
        }
    };
    entries.sort_by_key(|e| e.file_name());
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_inference_by_depth() {
        let d0 = infer_metadata("doom.exe");
        assert_eq!(d0.title, "doom");
        assert_eq!(d0.genre, "");
        assert_eq!(d0.developer, "");

        let d1 = infer_metadata("Doom Eternal/play.exe");
        assert_eq!(d1.title, "Doom Eternal");
        assert_eq!(d1.developer, "");

        let d2 = infer_metadata("id Software/Doom Eternal/play.exe");
        assert_eq!(d2.developer, "id Software");
        assert_eq!(d2.title, "Doom Eternal");
        assert_eq!(d2.genre, "");

        let d3 = infer_metadata("FPS/id Software/Doom Eternal/play.exe");
        assert_eq!(d3.genre, "FPS");
        assert_eq!(d3.developer, "id Software");
        assert_eq!(d3.title, "Doom Eternal");
    }

    #[test]
    fn deeper_nesting_keeps_immediate_parent_as_title() {
        let d5 = infer_metadata("FPS/id Software/classics/Doom II/doom2.exe");
        assert_eq!(d5.genre, "FPS");
        assert_eq!(d5.developer, "id Software");
        assert_eq!(d5.title, "Doom II");
    }
}
