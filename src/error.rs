//! Error types
//!
//! `GameError` covers rule violations the player can recover from. Its
//! `Display` text is what the player sees. `DictionaryError` covers word list
//! loading failures.

use crate::game::Position;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("Start a game first.")]
    NotInProgress,
    #[error("A game is already running. Reset to change settings.")]
    AlreadyStarted,
    #[error("Player count must be between 1 and {max}.")]
    InvalidPlayerCount { max: usize },
    #[error("No more tiles to peel!")]
    PoolEmpty,
    #[error("Not enough tiles in the pool to dump ({available} left, need {needed}).")]
    NotEnoughToDump { available: usize, needed: usize },
    #[error("That tile is not in your hand.")]
    TileNotInHand,
    #[error("Position ({}, {}) is off the board.", .0.x, .0.y)]
    OffBoard(Position),
    #[error("That tile is no longer at ({}, {}).", .0.x, .0.y)]
    StaleMove(Position),
    #[error("Select a cell first.")]
    NoSelection,
    #[error("No tile at ({}, {}).", .0.x, .0.y)]
    EmptyCell(Position),
    #[error("No '{0}' in your hand.")]
    LetterNotInHand(char),
    #[error("You must use all your tiles to win! ({remaining} left)")]
    TilesRemaining { remaining: usize },
    #[error("Board is empty. Nothing to check.")]
    BoardEmpty,
    #[error("The dictionary is still loading. Try again in a moment.")]
    DictionaryLoading,
    #[error("Error checking words. Could not load dictionary: {0}")]
    DictionaryUnavailable(String),
    #[error("Invalid words: {}", .0.join(", "))]
    InvalidWords(Vec<String>),
    #[error("Tiles must form words of at least 2 letters.")]
    NoWords,
    #[error("All tiles must be connected in a single group.")]
    Disconnected,
}

impl GameError {
    /// Board defects that become a forfeit once the pool is empty.
    pub fn is_board_defect(&self) -> bool {
        matches!(self, GameError::InvalidWords(_) | GameError::Disconnected)
    }
}

#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{path} contains no words")]
    Empty { path: PathBuf },
    #[error("no word list path configured")]
    NoPath,
    #[error("word list loader stopped unexpectedly")]
    LoaderGone,
}
