//! Outcome rules for the board.
//!
//! Pure functions of a [`Board`](crate::Board); the engine calls them after
//! every accepted turn and never after a terminal outcome.

pub mod draw;
pub mod win;

pub use draw::{is_draw, is_full};
pub use win::{LINES, check_winner};
