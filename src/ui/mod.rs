//! Ratatui front-end split by concern: application state and key handling,
//! form buffers, list screens, shared drawing helpers, and the terminal loop.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
