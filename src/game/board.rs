//! The square board grid. Storage only; the move engine enforces the rules.

use super::Tile;

/// Recommended side length.
pub const DEFAULT_BOARD_SIZE: usize = 25;

/// A board cell coordinate: `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// The four orthogonal neighbours that stay inside a board of `size`.
    pub fn neighbors(self, size: usize) -> impl Iterator<Item = Position> {
        let Position { x, y } = self;
        [
            x.checked_sub(1).map(|nx| Position::new(nx, y)),
            (x + 1 < size).then(|| Position::new(x + 1, y)),
            y.checked_sub(1).map(|ny| Position::new(x, ny)),
            (y + 1 < size).then(|| Position::new(x, y + 1)),
        ]
        .into_iter()
        .flatten()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    cells: Vec<Option<Tile>>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(DEFAULT_BOARD_SIZE)
    }
}

impl Board {
    /// An empty `size` x `size` board.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![None; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x < self.size && pos.y < self.size
    }

    fn index(&self, pos: Position) -> Option<usize> {
        self.contains(pos).then(|| pos.y * self.size + pos.x)
    }

    /// The tile at `pos`, if any. Off-board positions read as empty.
    pub fn get(&self, pos: Position) -> Option<&Tile> {
        self.index(pos).and_then(|i| self.cells[i].as_ref())
    }

    /// Replace the cell at `pos`, returning the previous occupant.
    /// Writes outside the board are ignored.
    pub fn set(&mut self, pos: Position, tile: Option<Tile>) -> Option<Tile> {
        match self.index(pos) {
            Some(i) => std::mem::replace(&mut self.cells[i], tile),
            None => None,
        }
    }

    /// Occupied cells in row-major scan order.
    pub fn occupied(&self) -> impl Iterator<Item = (Position, &Tile)> + '_ {
        let size = self.size;
        self.cells.iter().enumerate().filter_map(move |(i, cell)| {
            cell.as_ref()
                .map(|tile| (Position::new(i % size, i / size), tile))
        })
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|c| *c = None);
    }

    /// Letters of row `y`, `None` for empty cells.
    pub fn row(&self, y: usize) -> impl Iterator<Item = Option<char>> + '_ {
        (0..self.size).map(move |x| self.get(Position::new(x, y)).map(|t| t.letter))
    }

    /// Letters of column `x`, `None` for empty cells.
    pub fn column(&self, x: usize) -> impl Iterator<Item = Option<char>> + '_ {
        (0..self.size).map(move |y| self.get(Position::new(x, y)).map(|t| t.letter))
    }
}
