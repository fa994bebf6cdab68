//! Game logic: tiles, the bunch, the board, moves, word checks and opponents

pub mod board;
pub mod connectivity;
pub mod dictionary;
pub mod moves;
pub mod opponents;
pub mod pool;
pub mod validation;
pub mod words;

pub use board::{Board, Position, DEFAULT_BOARD_SIZE};
pub use moves::{Arrow, Cursor, Destination, MoveIntent, MoveOutcome, Origin, TypingDirection};
pub use pool::TilePool;

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;

/// Swedish tile distribution, the single source of truth for pool generation.
/// 144 tiles in total.
pub const TILE_DISTRIBUTION: [(char, u32); 26] = [
    ('A', 13),
    ('B', 2),
    ('C', 2),
    ('D', 7),
    ('E', 14),
    ('F', 3),
    ('G', 4),
    ('H', 3),
    ('I', 8),
    ('J', 1),
    ('K', 5),
    ('L', 8),
    ('M', 5),
    ('N', 12),
    ('O', 6),
    ('P', 3),
    ('R', 12),
    ('S', 9),
    ('T', 11),
    ('U', 3),
    ('V', 3),
    ('X', 1),
    ('Y', 1),
    ('Ä', 4),
    ('Ö', 2),
    ('Å', 2),
];

/// Letter -> tile count, built once from [`TILE_DISTRIBUTION`].
static LETTER_COUNTS: Lazy<HashMap<char, u32>> =
    Lazy::new(|| TILE_DISTRIBUTION.iter().copied().collect());

/// Total number of tiles in a fresh bunch.
pub static TOTAL_TILES: Lazy<usize> =
    Lazy::new(|| TILE_DISTRIBUTION.iter().map(|(_, n)| *n as usize).sum());

/// How many tiles of `letter` the distribution contains (0 for letters outside it).
pub fn letter_count(letter: char) -> u32 {
    LETTER_COUNTS
        .get(&normalize_letter(letter))
        .copied()
        .unwrap_or(0)
}

/// Whether `letter` belongs to the game alphabet (case-insensitive).
pub fn is_game_letter(letter: char) -> bool {
    letter_count(letter) > 0
}

/// Uppercase a single letter, including Å, Ä and Ö.
pub fn normalize_letter(letter: char) -> char {
    letter.to_uppercase().next().unwrap_or(letter)
}

/// Opaque tile identifier, unique within one generated bunch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub u32);

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tile-{}", self.0)
    }
}

/// A single letter tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub id: TileId,
    pub letter: char,
}

impl Tile {
    pub fn new(id: u32, letter: char) -> Self {
        Self {
            id: TileId(id),
            letter: normalize_letter(letter),
        }
    }
}

/// An unordered collection of tiles owned by one participant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hand {
    tiles: Vec<Tile>,
}

impl Hand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tiles(tiles: Vec<Tile>) -> Self {
        Self { tiles }
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn contains(&self, id: TileId) -> bool {
        self.tiles.iter().any(|t| t.id == id)
    }

    /// Add a tile unless a tile with the same id is already held.
    pub fn insert(&mut self, tile: Tile) {
        if !self.contains(tile.id) {
            self.tiles.push(tile);
        }
    }

    pub fn extend(&mut self, tiles: impl IntoIterator<Item = Tile>) {
        for tile in tiles {
            self.insert(tile);
        }
    }

    /// Remove and return the tile with the given id.
    pub fn remove(&mut self, id: TileId) -> Option<Tile> {
        let pos = self.tiles.iter().position(|t| t.id == id)?;
        Some(self.tiles.remove(pos))
    }

    /// First tile carrying `letter`, compared case-insensitively.
    pub fn find_letter(&self, letter: char) -> Option<Tile> {
        let wanted = normalize_letter(letter);
        self.tiles.iter().find(|t| t.letter == wanted).copied()
    }

    /// Remove one arbitrary tile (the most recently drawn one).
    pub fn pop(&mut self) -> Option<Tile> {
        self.tiles.pop()
    }

    /// Display the hand as a string of letters.
    pub fn as_string(&self) -> String {
        self.tiles.iter().map(|t| t.letter).collect()
    }
}
