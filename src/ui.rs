//! Ratatui front end. One card at a time: the word, its translations and the
//! current example pair, with key bindings to move between cards and
//! examples, add words and save. All cursor state lives here; the store only
//! answers queries.

mod app;
mod cursor;
mod forms;
mod helpers;
mod terminal;

pub use app::App;
pub use terminal::run_app;
