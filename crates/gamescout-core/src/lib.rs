/// GameScout Core — library scanning, exclusion, and catalog engine.
///
/// This crate contains all business logic with zero UI dependencies.
/// It is designed to be reusable across different frontends (GUI, CLI, TUI).
///
/// # Modules
///
/// - [`model`] — The `Game` record and launch-target resolution.
/// - [`paths`] — Path normalisation and library-relative ⇄ absolute conversion.
/// - [`exceptions`] — Heuristic auto-exclusion patterns and persisted exception entries.
/// - [`walker`] — Depth-limited directory traversal and executable selection.
/// - [`scanner`] — Background scanning with progress reporting and cancellation.
/// - [`store`] — Catalog and configuration persistence.
/// - [`platform`] — Platform-specific executable-candidate detection.
pub mod exceptions;
pub mod model;
pub mod paths;
pub mod platform;
pub mod scanner;
pub mod store;
pub mod walker;
