//! Board validation for the win check
//!
//! Checks, in order:
//! 1. Every extracted word is in the dictionary
//! 2. At least one word of 2+ letters exists
//! 3. All tiles form one connected group

use super::connectivity::is_board_connected;
use super::dictionary::WordList;
use super::words::extract_words;
use super::Board;
use crate::error::GameError;

/// Outcome of validating a board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardVerdict {
    /// Board is a finished grid; carries the words found.
    Valid { words: Vec<String> },
    /// Words missing from the dictionary, first occurrence order, no repeats.
    InvalidWords(Vec<String>),
    /// No run of 2+ letters anywhere.
    NoWords,
    /// Tiles are split into more than one group.
    Disconnected,
}

impl BoardVerdict {
    /// Convert into the game's error vocabulary.
    pub fn into_result(self) -> Result<Vec<String>, GameError> {
        match self {
            BoardVerdict::Valid { words } => Ok(words),
            BoardVerdict::InvalidWords(words) => Err(GameError::InvalidWords(words)),
            BoardVerdict::NoWords => Err(GameError::NoWords),
            BoardVerdict::Disconnected => Err(GameError::Disconnected),
        }
    }
}

/// Validate a board against a word list.
pub fn validate_board(board: &Board, dictionary: &dyn WordList) -> BoardVerdict {
    let words = extract_words(board);

    let mut invalid: Vec<String> = Vec::new();
    for word in &words {
        if !dictionary.contains(word) && !invalid.contains(word) {
            invalid.push(word.clone());
        }
    }
    if !invalid.is_empty() {
        return BoardVerdict::InvalidWords(invalid);
    }

    if words.is_empty() {
        return BoardVerdict::NoWords;
    }

    if !is_board_connected(board) {
        return BoardVerdict::Disconnected;
    }

    BoardVerdict::Valid { words }
}
