/// Two-tier exclusion engine.
///
/// Tier one is the [`AutoExcluder`]: pure pattern heuristics over
/// constant tables, no I/O and no persisted state. It silently filters
/// the obvious non-games (installers, uninstallers, redistributables).
///
/// Tier two is the [`ExceptionSet`]: persisted, user-visible entries
/// naming *specific* library-relative paths. The scanner records every
/// file it passed over here, so the exceptions UI shows concrete
/// discovered paths rather than abstract patterns.
pub mod patterns;

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::warn;

use crate::paths;

/// Candidate stems that always denote a launcher, used both by the
/// walker's pick priority and the batch-file exclusion fallback.
pub const LAUNCH_STEMS: &[&str] = &["game", "launch", "play"];

/// Heuristic pattern matcher for non-game executables.
///
/// Holds owned copies of the tables so tests can substitute small ones;
/// [`AutoExcluder::default`] loads the built-in tables from
/// [`patterns`].
#[derive(Debug, Clone)]
pub struct AutoExcluder {
    keywords: Vec<String>,
    exact_stems: HashSet<String>,
    suffixes: Vec<String>,
    batch_stems: HashSet<String>,
    stem_prefixes: Vec<String>,
}

impl Default for AutoExcluder {
    fn default() -> Self {
        let mut this = Self::with_tables(patterns::KEYWORDS, patterns::EXACT_STEMS, patterns::SUFFIXES);
        this.batch_stems = patterns::BATCH_STEMS.iter().map(|s| s.to_string()).collect();
        this.stem_prefixes = patterns::STEM_PREFIXES.iter().map(|s| s.to_string()).collect();
        this
    }
}

impl AutoExcluder {
    /// Build a matcher over explicit tables. Tables are case-folded once
    /// here so every query is a plain lowercase comparison.
    pub fn with_tables(keywords: &[&str], exact_stems: &[&str], suffixes: &[&str]) -> Self {
        Self {
            keywords: keywords.iter().map(|s| s.to_lowercase()).collect(),
            exact_stems: exact_stems.iter().map(|s| s.to_lowercase()).collect(),
            suffixes: suffixes.iter().map(|s| s.to_lowercase()).collect(),
            batch_stems: HashSet::new(),
            stem_prefixes: Vec::new(),
        }
    }

    /// Decide whether `path` is an obvious non-game.
    ///
    /// Pure heuristic over the filename only — no filesystem access.
    pub fn should_auto_exclude(&self, path: &Path) -> bool {
        let stem = match path.file_stem() {
            Some(s) => s.to_string_lossy().to_lowercase(),
            None => return false,
        };
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        if self.exact_stems.contains(stem.as_str()) {
            return true;
        }
        // Copies like "oggenc2 (1)" still match their base stem.
        if let Some(base) = strip_copy_marker(&stem) {
            if self.exact_stems.contains(base) {
                return true;
            }
        }

        if self.keywords.iter().any(|kw| contains_whole_word(&stem, kw)) {
            return true;
        }

        if self.stem_prefixes.iter().any(|p| stem.starts_with(p.as_str())) {
            return true;
        }

        if self.suffixes.iter().any(|s| stem.ends_with(s.as_str())) {
            return true;
        }

        // Batch files are helper scripts unless named like a launcher.
        if ext == "bat" || ext == "cmd" {
            if self.batch_stems.contains(stem.as_str()) {
                return true;
            }
            let launcher = LAUNCH_STEMS.contains(&stem.as_str())
                || LAUNCH_STEMS.iter().any(|v| stem.starts_with(&format!("{v} ")));
            if !self.batch_stems.is_empty() && !launcher {
                return true;
            }
        }

        false
    }
}

/// Strip a trailing ` (n)` copy marker from a stem, returning the base.
fn strip_copy_marker(stem: &str) -> Option<&str> {
    let open = stem.rfind(" (")?;
    if stem.ends_with(')') {
        Some(stem[..open].trim_end())
    } else {
        None
    }
}

/// Whole-word containment: `needle` must appear in `haystack` with a
/// non-alphanumeric character (or the string edge) on both sides.
///
/// This is deliberately not regex `\b` semantics — underscores count as
/// boundaries here, so `"setup"` matches `game_setup` but not
/// `mysetupvar`.
fn contains_whole_word(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    let bytes = haystack.as_bytes();
    let mut start = 0;
    while let Some(pos) = haystack[start..].find(needle) {
        let at = start + pos;
        let end = at + needle.len();
        let before_ok = at == 0 || !bytes[at - 1].is_ascii_alphanumeric();
        let after_ok = end == bytes.len() || !bytes[end].is_ascii_alphanumeric();
        if before_ok && after_ok {
            return true;
        }
        start = at + 1;
    }
    false
}

/// Persisted exception entries — one string per suppressed path.
///
/// Two variants, distinguished by a trailing `/`:
/// - *file exceptions* match a library-relative path exactly or, when
///   the entry contains `*`, as a glob;
/// - *folder exceptions* match any path under their prefix and cause
///   the walker to prune the whole subtree.
///
/// Entries are normalised, deduplicated, and stored in insertion order.
/// Serialises as a plain array of strings in `config.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct ExceptionSet {
    entries: Vec<String>,
    /// Compiled matcher for the `*`-bearing file entries, rebuilt on
    /// mutation so queries never pay compilation cost.
    wildcards: GlobSet,
}

impl Default for ExceptionSet {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            wildcards: GlobSet::empty(),
        }
    }
}

/// Equality is over the stored entries; the compiled matcher is a
/// cache.
impl PartialEq for ExceptionSet {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for ExceptionSet {}

impl From<Vec<String>> for ExceptionSet {
    fn from(raw: Vec<String>) -> Self {
        let mut set = ExceptionSet::default();
        for entry in raw {
            set.add(&entry);
        }
        set
    }
}

impl From<ExceptionSet> for Vec<String> {
    fn from(set: ExceptionSet) -> Self {
        set.entries
    }
}

impl ExceptionSet {
    /// Insert a normalised entry.
    ///
    /// Returns `false` without mutating when the entry is empty, an
    /// exact duplicate, already covered by an existing folder exception,
    /// or a malformed glob — which makes bulk-add during scans
    /// idempotent.
    pub fn add(&mut self, entry: &str) -> bool {
        let entry = paths::normalize(entry);
        if entry.is_empty() || entry == "/" {
            return false;
        }
        if self.entries.iter().any(|e| e == &entry) {
            return false;
        }
        if self.covered_by_folder(&entry) {
            return false;
        }
        if entry.contains('*') && Glob::new(&entry).is_err() {
            warn!("rejecting malformed exception glob: {entry}");
            return false;
        }
        self.entries.push(entry);
        self.rebuild_wildcards();
        true
    }

    /// Remove an entry. Returns whether it was present.
    pub fn remove(&mut self, entry: &str) -> bool {
        let entry = paths::normalize(entry);
        let before = self.entries.len();
        self.entries.retain(|e| e != &entry);
        let removed = self.entries.len() != before;
        if removed {
            self.rebuild_wildcards();
        }
        removed
    }

    /// `true` if the library-relative path matches any entry: exact file
    /// match, glob match, or folder-prefix match.
    ///
    /// Folder prefixes are segment-safe — `tools/` matches
    /// `tools/setup.exe` and `tools` itself, never `toolbox/x.exe`.
    pub fn is_match(&self, relative: &str) -> bool {
        let rel = paths::normalize(relative);
        for entry in &self.entries {
            if let Some(prefix) = entry.strip_suffix('/') {
                if rel == prefix || rel.starts_with(entry.as_str()) {
                    return true;
                }
            } else if rel == *entry {
                return true;
            }
        }
        self.wildcards.is_match(rel.as_str())
    }

    /// `true` if the path (or a would-be entry) falls under an existing
    /// folder exception.
    pub fn covered_by_folder(&self, relative: &str) -> bool {
        let rel = paths::normalize(relative);
        self.entries
            .iter()
            .filter_map(|e| e.strip_suffix('/').map(|p| (p, e)))
            .any(|(prefix, entry)| {
                rel == prefix || rel == entry.as_str() || rel.starts_with(entry.as_str())
            })
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn rebuild_wildcards(&mut self) {
        let mut builder = GlobSetBuilder::new();
        for entry in self.entries.iter().filter(|e| e.contains('*') && !e.ends_with('/')) {
            match Glob::new(entry) {
                Ok(glob) => {
                    builder.add(glob);
                }
                Err(err) => warn!("skipping malformed exception glob {entry}: {err}"),
            }
        }
        match builder.build() {
            Ok(set) => self.wildcards = set,
            Err(err) => warn!("failed to compile exception globs: {err}"),
        }
    }
}
