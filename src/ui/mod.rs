//! Terminal front end: a ratatui view of the arena drawn on a canvas, with a
//! compact grid and session stats alongside.

mod app;
pub mod board_widget;
mod game_view;

pub use app::{App, TICK};
