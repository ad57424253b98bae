/// Data model — games, libraries, and field validation.
pub mod game;
pub mod library;
pub mod validate;

pub use game::{Game, LaunchTarget, Platform};
pub use library::Library;
pub use validate::FieldError;
