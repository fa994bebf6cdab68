//! Screen state and keyboard intents
//!
//! Maps the front-end's key presses onto [`Game`] intents:
//! - Setup: choose the player count, start
//! - Playing: cursor placement, peel, dump, carry tiles, win check
//! - Over: result shown until reset

use super::state::{Game, GameStatus};
use crate::game::{Arrow, Destination, MoveIntent};
use std::time::Instant;

/// Which screen the front-end shows, derived from the game status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Setup,
    Playing,
    Over,
}

impl Screen {
    pub fn of(status: GameStatus) -> Self {
        match status {
            GameStatus::PreGame => Screen::Setup,
            GameStatus::InProgress => Screen::Playing,
            _ => Screen::Over,
        }
    }
}

/// What the next letter key or drop means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Letters place tiles at the cursor.
    #[default]
    Normal,
    /// The next letter names a hand tile to dump.
    Dump,
    /// A board tile is picked up, waiting to be dropped at the cursor.
    Carrying(MoveIntent),
}

impl InputMode {
    pub fn label(&self) -> &'static str {
        match self {
            InputMode::Normal => "TYPE",
            InputMode::Dump => "DUMP",
            InputMode::Carrying(_) => "MOVE",
        }
    }
}

/// Front-end state wrapped around the game.
pub struct AppCoordinator {
    pub game: Game,
    pub mode: InputMode,
    pub should_quit: bool,
}

impl AppCoordinator {
    pub fn new(game: Game) -> Self {
        Self {
            game,
            mode: InputMode::Normal,
            should_quit: false,
        }
    }

    pub fn screen(&self) -> Screen {
        Screen::of(self.game.status())
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Advance opponent clocks and the dictionary load.
    pub fn poll(&mut self, now: Instant) -> bool {
        let changed = self.game.tick(now);
        if self.screen() != Screen::Playing {
            self.mode = InputMode::Normal;
        }
        changed
    }

    // === Setup ===

    pub fn setup_digit(&mut self, digit: u32) {
        let _ = self.game.set_player_count(digit as usize);
    }

    /// Enter: start from setup, check the board while playing, back to setup
    /// once the game is over.
    pub fn confirm(&mut self, now: Instant) {
        match self.screen() {
            Screen::Setup => {
                let _ = self.game.start_game(now);
            }
            Screen::Playing => {
                self.mode = InputMode::Normal;
                let _ = self.game.check_win();
            }
            Screen::Over => self.reset(),
        }
    }

    pub fn reset(&mut self) {
        self.mode = InputMode::Normal;
        self.game.reset();
    }

    /// Esc: leave a pending mode, otherwise quit.
    pub fn escape(&mut self) {
        if self.mode != InputMode::Normal {
            self.mode = InputMode::Normal;
        } else {
            self.quit();
        }
    }

    // === Playing ===

    pub fn arrow(&mut self, arrow: Arrow) {
        let _ = self.game.move_selection(arrow);
    }

    pub fn letter(&mut self, letter: char) {
        match self.mode {
            InputMode::Dump => {
                self.mode = InputMode::Normal;
                let _ = self.game.dump_letter(letter);
            }
            _ => {
                let _ = self.game.place_by_letter(letter);
            }
        }
    }

    pub fn backspace(&mut self) {
        let _ = self.game.backspace();
    }

    pub fn toggle_direction(&mut self) {
        let _ = self.game.toggle_typing_direction();
    }

    pub fn peel(&mut self) {
        let _ = self.game.peel();
    }

    pub fn begin_dump(&mut self) {
        if self.screen() == Screen::Playing {
            self.mode = InputMode::Dump;
        }
    }

    /// Pick up the tile under the cursor, or drop the carried one there.
    pub fn carry(&mut self) {
        match self.mode {
            InputMode::Carrying(intent) => {
                self.mode = InputMode::Normal;
                if let Some(pos) = self.game.cursor().selection {
                    let _ = self.game.move_tile(intent, Destination::At(pos));
                }
            }
            _ => {
                if let Ok(intent) = self.game.pick_up() {
                    self.mode = InputMode::Carrying(intent);
                }
            }
        }
    }

    /// Send the tile under the cursor back to the hand.
    pub fn return_to_hand(&mut self) {
        self.mode = InputMode::Normal;
        if let Ok(intent) = self.game.pick_up() {
            let _ = self.game.move_tile(intent, Destination::Hand);
        }
    }
}
