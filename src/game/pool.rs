//! The bunch: generation, drawing, dumping and the initial deal

use super::{Tile, TILE_DISTRIBUTION, TOTAL_TILES};
use rand::prelude::*;

/// Tiles dealt to each participant by player count.
pub fn starting_tile_count(participants: usize) -> usize {
    match participants {
        0..=4 => 21,
        5..=6 => 15,
        _ => 11,
    }
}

/// The shared, shuffled reserve of undrawn tiles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TilePool {
    tiles: Vec<Tile>,
}

/// Result of dealing starting hands from a fresh pool.
#[derive(Debug, Clone)]
pub struct Deal {
    pub human: Vec<Tile>,
    pub opponents: Vec<Vec<Tile>>,
    pub pool: TilePool,
}

impl TilePool {
    /// Build every tile of the distribution, give each a unique id and shuffle.
    pub fn generate_with_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut next_id = 0;
        let mut tiles = Vec::with_capacity(*TOTAL_TILES);
        for (letter, count) in TILE_DISTRIBUTION {
            for _ in 0..count {
                tiles.push(Tile::new(next_id, letter));
                next_id += 1;
            }
        }
        tiles.shuffle(rng);
        Self { tiles }
    }

    /// Wrap an explicit tile order (unshuffled).
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

    /// Take up to `n` tiles from the front. Draws whatever is left when the
    /// pool holds fewer than `n`.
    pub fn draw(&mut self, n: usize) -> Vec<Tile> {
        let n = n.min(self.tiles.len());
        self.tiles.drain(..n).collect()
    }

    /// Take a single tile from the front.
    pub fn draw_one(&mut self) -> Option<Tile> {
        if self.tiles.is_empty() {
            None
        } else {
            Some(self.tiles.remove(0))
        }
    }

    /// Put a tile back at the end of the pool.
    pub fn return_tile(&mut self, tile: Tile) {
        self.tiles.push(tile);
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.tiles.shuffle(rng);
    }

    /// Deal `per_participant` tiles to the human, then to each opponent in
    /// order. Later participants get fewer tiles if the pool runs out.
    pub fn deal_initial(mut self, participants: usize, per_participant: usize) -> Deal {
        let human = self.draw(per_participant);
        let opponents = (1..participants)
            .map(|_| self.draw(per_participant))
            .collect();
        Deal {
            human,
            opponents,
            pool: self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::letter_count;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::{HashMap, HashSet};

    fn small_pool(n: u32) -> TilePool {
        TilePool::from_tiles((0..n).map(|i| Tile::new(i, 'A')).collect())
    }

    #[test]
    fn test_generate_matches_distribution() {
        let pool = TilePool::generate_with_rng(&mut rand::rng());
        assert_eq!(pool.len(), *TOTAL_TILES);

        let mut counts: HashMap<char, u32> = HashMap::new();
        for tile in pool.tiles() {
            *counts.entry(tile.letter).or_insert(0) += 1;
        }
        for (letter, count) in TILE_DISTRIBUTION {
            assert_eq!(counts.get(&letter).copied(), Some(count), "letter {}", letter);
            assert_eq!(letter_count(letter), count);
        }
    }

    #[test]
    fn test_generate_ids_unique() {
        let pool = TilePool::generate_with_rng(&mut rand::rng());
        let ids: HashSet<_> = pool.tiles().iter().map(|t| t.id).collect();
        assert_eq!(ids.len(), pool.len());
    }

    #[test]
    fn test_seeded_generation_is_deterministic() {
        let mut rng1 = StdRng::seed_from_u64(42);
        let mut rng2 = StdRng::seed_from_u64(42);
        assert_eq!(
            TilePool::generate_with_rng(&mut rng1),
            TilePool::generate_with_rng(&mut rng2)
        );
    }

    #[test]
    fn test_generate_is_shuffled() {
        let mut rng = StdRng::seed_from_u64(7);
        let pool = TilePool::generate_with_rng(&mut rng);
        let in_order: Vec<u32> = (0..*TOTAL_TILES as u32).collect();
        let ids: Vec<u32> = pool.tiles().iter().map(|t| t.id.0).collect();
        assert_ne!(ids, in_order);
    }

    #[test]
    fn test_draw_exact() {
        let mut pool = small_pool(10);
        let drawn = pool.draw(4);
        assert_eq!(drawn.len(), 4);
        assert_eq!(pool.len(), 6);
        assert_eq!(drawn[0].id.0, 0);
        assert_eq!(pool.tiles()[0].id.0, 4);
    }

    #[test]
    fn test_draw_more_than_available() {
        let mut pool = small_pool(3);
        let drawn = pool.draw(5);
        assert_eq!(drawn.len(), 3);
        assert!(pool.is_empty());
        assert!(pool.draw(1).is_empty());
    }

    #[test]
    fn test_starting_tile_count() {
        assert_eq!(starting_tile_count(0), 21);
        assert_eq!(starting_tile_count(1), 21);
        assert_eq!(starting_tile_count(4), 21);
        assert_eq!(starting_tile_count(5), 15);
        assert_eq!(starting_tile_count(6), 15);
        assert_eq!(starting_tile_count(7), 11);
        assert_eq!(starting_tile_count(10), 11);
    }

    #[test]
    fn test_deal_initial_order() {
        let deal = small_pool(50).deal_initial(3, 10);
        assert_eq!(deal.human.len(), 10);
        assert_eq!(deal.human[0].id.0, 0);
        assert_eq!(deal.opponents.len(), 2);
        assert_eq!(deal.opponents[0][0].id.0, 10);
        assert_eq!(deal.opponents[1][0].id.0, 20);
        assert_eq!(deal.pool.len(), 20);
    }

    #[test]
    fn test_deal_initial_exhausts_pool() {
        let deal = small_pool(25).deal_initial(4, 10);
        assert_eq!(deal.human.len(), 10);
        assert_eq!(deal.opponents[0].len(), 10);
        assert_eq!(deal.opponents[1].len(), 5);
        assert_eq!(deal.opponents[2].len(), 0);
        assert!(deal.pool.is_empty());
    }

    #[test]
    fn test_return_and_shuffle_keep_tiles() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut pool = small_pool(5);
        pool.return_tile(Tile::new(99, 'Ö'));
        pool.shuffle(&mut rng);
        assert_eq!(pool.len(), 6);
        assert!(pool.tiles().iter().any(|t| t.id.0 == 99));
    }
}
