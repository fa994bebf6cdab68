//! Move engine: tile transfer between hand and board, and cursor placement
//!
//! Every operation validates before it mutates, so a failed move leaves the
//! board and hand exactly as they were.

use super::{Board, Hand, Position, Tile};
use crate::error::GameError;

/// Where a dragged tile came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Hand,
    At(Position),
}

/// Where a dragged tile is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Hand,
    At(Position),
}

/// A tile picked up from its origin, waiting to be dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveIntent {
    pub tile: Tile,
    pub origin: Origin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Dropped where it started; nothing was touched.
    Unchanged,
    /// The move happened. `displaced` is a tile that went back to the hand.
    Moved { displaced: Option<Tile> },
}

impl MoveIntent {
    pub fn from_hand(tile: Tile) -> Self {
        Self {
            tile,
            origin: Origin::Hand,
        }
    }

    pub fn from_board(tile: Tile, pos: Position) -> Self {
        Self {
            tile,
            origin: Origin::At(pos),
        }
    }

    /// Apply the move to `board` and `hand`.
    pub fn apply(
        &self,
        board: &mut Board,
        hand: &mut Hand,
        destination: Destination,
    ) -> Result<MoveOutcome, GameError> {
        self.validate(board, hand, destination)?;

        match (self.origin, destination) {
            (Origin::At(from), Destination::At(to)) if from == to => Ok(MoveOutcome::Unchanged),
            (Origin::Hand, Destination::Hand) => Ok(MoveOutcome::Unchanged),
            (Origin::Hand, Destination::At(to)) => {
                hand.remove(self.tile.id);
                let displaced = board.set(to, Some(self.tile));
                if let Some(prev) = displaced {
                    hand.insert(prev);
                }
                Ok(MoveOutcome::Moved { displaced })
            }
            (Origin::At(from), Destination::Hand) => {
                board.set(from, None);
                hand.insert(self.tile);
                Ok(MoveOutcome::Moved { displaced: None })
            }
            (Origin::At(from), Destination::At(to)) => {
                // Swap: the destination's occupant (if any) takes the source cell.
                let prev = board.set(to, Some(self.tile));
                board.set(from, prev);
                Ok(MoveOutcome::Moved { displaced: None })
            }
        }
    }

    fn validate(&self, board: &Board, hand: &Hand, destination: Destination) -> Result<(), GameError> {
        match self.origin {
            Origin::Hand => {
                if !hand.contains(self.tile.id) {
                    return Err(GameError::TileNotInHand);
                }
            }
            Origin::At(from) => {
                if !board.contains(from) {
                    return Err(GameError::OffBoard(from));
                }
                if board.get(from).map(|t| t.id) != Some(self.tile.id) {
                    return Err(GameError::StaleMove(from));
                }
            }
        }
        if let Destination::At(to) = destination {
            if !board.contains(to) {
                return Err(GameError::OffBoard(to));
            }
        }
        Ok(())
    }
}

/// Direction the cursor advances after a keyboard placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypingDirection {
    #[default]
    Horizontal,
    Vertical,
}

impl TypingDirection {
    pub fn toggled(self) -> Self {
        match self {
            TypingDirection::Horizontal => TypingDirection::Vertical,
            TypingDirection::Vertical => TypingDirection::Horizontal,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TypingDirection::Horizontal => "HORIZONTAL",
            TypingDirection::Vertical => "VERTICAL",
        }
    }
}

/// Arrow-key navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrow {
    Up,
    Down,
    Left,
    Right,
}

/// Selection cursor for sequential keyboard placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub selection: Option<Position>,
    pub direction: TypingDirection,
}

impl Cursor {
    pub fn select(&mut self, pos: Option<Position>, board: &Board) -> Result<(), GameError> {
        match pos {
            Some(p) if !board.contains(p) => Err(GameError::OffBoard(p)),
            _ => {
                self.selection = pos;
                Ok(())
            }
        }
    }

    pub fn toggle_direction(&mut self) {
        self.direction = self.direction.toggled();
    }

    /// Move the selection one cell, clamped to the board. Selects the centre
    /// cell when nothing is selected yet.
    pub fn step(&mut self, arrow: Arrow, size: usize) {
        let Some(pos) = self.selection else {
            self.selection = Some(Position::new(size / 2, size / 2));
            return;
        };
        let last = size.saturating_sub(1);
        self.selection = Some(match arrow {
            Arrow::Up => Position::new(pos.x, pos.y.saturating_sub(1)),
            Arrow::Down => Position::new(pos.x, (pos.y + 1).min(last)),
            Arrow::Left => Position::new(pos.x.saturating_sub(1), pos.y),
            Arrow::Right => Position::new((pos.x + 1).min(last), pos.y),
        });
    }

    fn advance(&mut self, size: usize) {
        let arrow = match self.direction {
            TypingDirection::Horizontal => Arrow::Right,
            TypingDirection::Vertical => Arrow::Down,
        };
        self.step(arrow, size);
    }

    fn retreat(&mut self, size: usize) {
        let arrow = match self.direction {
            TypingDirection::Horizontal => Arrow::Left,
            TypingDirection::Vertical => Arrow::Up,
        };
        self.step(arrow, size);
    }

    /// Place the first hand tile matching `letter` at the cursor, then advance.
    pub fn place_by_letter(
        &mut self,
        letter: char,
        board: &mut Board,
        hand: &mut Hand,
    ) -> Result<MoveOutcome, GameError> {
        let pos = self.selection.ok_or(GameError::NoSelection)?;
        let tile = hand
            .find_letter(letter)
            .ok_or_else(|| GameError::LetterNotInHand(super::normalize_letter(letter)))?;
        let outcome = MoveIntent::from_hand(tile).apply(board, hand, Destination::At(pos))?;
        self.advance(board.size());
        Ok(outcome)
    }

    /// Return the tile under the cursor to the hand (if any), then step back.
    pub fn backspace(&mut self, board: &mut Board, hand: &mut Hand) -> Result<Option<Tile>, GameError> {
        let pos = self.selection.ok_or(GameError::NoSelection)?;
        let removed = match board.get(pos).copied() {
            Some(tile) => {
                MoveIntent::from_board(tile, pos).apply(board, hand, Destination::Hand)?;
                Some(tile)
            }
            None => None,
        };
        self.retreat(board.size());
        Ok(removed)
    }
}
