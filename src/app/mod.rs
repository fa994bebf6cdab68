//! Game controller and the keyboard-facing coordinator around it

pub mod screen;
pub mod state;

pub use screen::{AppCoordinator, InputMode, Screen};
pub use state::{opponent_label, Game, GameStatus, Snapshot, MAX_PLAYERS};
