//! Connectivity check: all tiles must form one orthogonally connected group

use super::{Board, Position};
use std::collections::{HashSet, VecDeque};

/// Breadth-first search from the first position over 4-neighbours inside
/// `positions`. An empty set is not connected.
pub fn is_connected(positions: &[Position]) -> bool {
    let Some(&start) = positions.first() else {
        return false;
    };
    let occupied: HashSet<Position> = positions.iter().copied().collect();

    let mut visited = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(pos) = queue.pop_front() {
        for next in pos.neighbors(usize::MAX) {
            if occupied.contains(&next) && visited.insert(next) {
                queue.push_back(next);
            }
        }
    }

    visited.len() == occupied.len()
}

/// Whether the tiles on `board` form a single group.
pub fn is_board_connected(board: &Board) -> bool {
    let positions: Vec<Position> = board.occupied().map(|(pos, _)| pos).collect();
    is_connected(&positions)
}
