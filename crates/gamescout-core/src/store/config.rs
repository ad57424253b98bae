/// Typed configuration schema for `config.json`.
///
/// Versioned and strongly typed: the file is validated once at load
/// time into [`Config`], with every missing key defaulting explicitly
/// via the container-level `serde(default)` — no duck-typed key probing
/// anywhere else in the codebase.
use crate::exceptions::ExceptionSet;
use crate::model::Library;
use serde::{Deserialize, Serialize};

/// Current schema version, written on every save.
pub const CONFIG_VERSION: u32 = 1;

/// Process-wide settings, owned exclusively by the catalog store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub version: u32,
    pub libraries: Vec<Library>,
    pub exceptions: ExceptionSet,
    pub saved_state: SavedState,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            libraries: Vec::new(),
            exceptions: ExceptionSet::default(),
            saved_state: SavedState::default(),
        }
    }
}

/// UI preference state, persisted and round-tripped by the engine but
/// interpreted only by the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SavedState {
    pub window_size: Option<(u32, u32)>,
    pub window_position: Option<(i32, i32)>,
    pub splitter_position: Option<u32>,
    pub sort_column: u32,
    pub sort_ascending: bool,
    pub last_selected: Option<String>,
    pub last_search: String,
    pub tree_selections: Vec<String>,
    pub tree_filters: Vec<String>,
}

impl Default for SavedState {
    fn default() -> Self {
        Self {
            window_size: None,
            window_position: None,
            splitter_position: None,
            sort_column: 0,
            sort_ascending: true,
            last_selected: None,
            last_search: String::new(),
            tree_selections: Vec::new(),
            tree_filters: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_default_at_load() {
        // A minimal file from an older build — only libraries present.
        let json = r#"{ "libraries": [{ "name": "Games", "path": "/srv/games" }] }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.version, CONFIG_VERSION);
        assert_eq!(config.libraries.len(), 1);
        assert!(config.exceptions.is_empty());
        assert!(config.saved_state.sort_ascending);
    }

    #[test]
    fn saved_state_roundtrips() {
        let mut config = Config::default();
        config.saved_state.window_size = Some((1280, 800));
        config.saved_state.last_selected = Some("Doom".into());
        config.saved_state.tree_filters = vec!["genre".into(), "developer".into()];

        let json = serde_json::to_string(&config).unwrap();
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back.saved_state, config.saved_state);
    }
}
