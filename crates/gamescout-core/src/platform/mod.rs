/// Platform-specific executable-candidate detection.
///
/// What counts as "an executable" differs per platform:
/// - Windows: `.exe` and `.bat` files;
/// - macOS: `.app` bundles, `.sh`/`.command` scripts, and files with
///   the execute permission bit;
/// - Linux/Unix: `.sh`/`.run` scripts and files with the execute bit.
use std::fs::Metadata;
use std::path::Path;

/// `true` if the directory entry is a candidate launchable for the
/// platform this process runs on.
///
/// `meta` must come from `symlink_metadata` on `path` — symlinks are
/// the caller's responsibility to skip before calling this.
#[cfg(windows)]
pub fn is_executable_candidate(path: &Path, meta: &Metadata) -> bool {
    if !meta.is_file() {
        return false;
    }
    matches!(
        extension_lower(path).as_deref(),
        Some("exe") | Some("bat")
    )
}

#[cfg(target_os = "macos")]
pub fn is_executable_candidate(path: &Path, meta: &Metadata) -> bool {
    // .app bundles are directories but launch as a unit.
    if meta.is_dir() {
        return extension_lower(path).as_deref() == Some("app");
    }
    if !meta.is_file() {
        return false;
    }
    if matches!(extension_lower(path).as_deref(), Some("sh") | Some("command")) {
        return true;
    }
    has_execute_bit(meta)
}

#[cfg(all(unix, not(target_os = "macos")))]
pub fn is_executable_candidate(path: &Path, meta: &Metadata) -> bool {
    if !meta.is_file() {
        return false;
    }
    if matches!(extension_lower(path).as_deref(), Some("sh") | Some("run")) {
        return true;
    }
    has_execute_bit(meta)
}

#[cfg(unix)]
fn has_execute_bit(meta: &Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o111 != 0
}

fn extension_lower(path: &Path) -> Option<String> {
    path.extension().map(|e| e.to_string_lossy().to_lowercase())
}

/// `true` for entries the walker should never descend into — on macOS
/// that is `.app` bundles, which are picked as candidates instead.
pub fn is_opaque_bundle(path: &Path) -> bool {
    cfg!(target_os = "macos") && extension_lower(path).as_deref() == Some("app")
}
