//! Simulated opponents and their clocks
//!
//! Each opponent holds a deadline on a logical clock. The caller supplies
//! `now`; nothing here spawns threads or sleeps.

use super::{Hand, Tile};
use rand::Rng;
use std::time::{Duration, Instant};

/// How fast simulated opponents play.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpponentTiming {
    /// Minimum delay between two tiles.
    pub base: Duration,
    /// Upper bound of the uniform random extra delay.
    pub jitter: Duration,
    /// Multiplier applied before an opponent plays its final tile.
    pub last_tile_factor: f64,
}

impl Default for OpponentTiming {
    fn default() -> Self {
        Self {
            base: Duration::from_millis(4000),
            jitter: Duration::from_millis(3000),
            last_tile_factor: 2.5,
        }
    }
}

impl OpponentTiming {
    /// Delay before the next tile is played from a hand of `hand_size`.
    pub fn delay_for<R: Rng + ?Sized>(&self, hand_size: usize, rng: &mut R) -> Duration {
        let jitter_ms = self.jitter.as_millis() as u64;
        let extra = if jitter_ms == 0 {
            0
        } else {
            rng.random_range(0..=jitter_ms)
        };
        let delay = self.base + Duration::from_millis(extra);
        if hand_size == 1 {
            // Out-of-range factors keep the plain delay.
            Duration::try_from_secs_f64(delay.as_secs_f64() * self.last_tile_factor)
                .unwrap_or(delay)
        } else {
            delay
        }
    }
}

/// A simulated player. Tiles it uses move from `hand` to `played`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Opponent {
    pub hand: Hand,
    pub played: Vec<Tile>,
}

impl Opponent {
    pub fn new(tiles: Vec<Tile>) -> Self {
        Self {
            hand: Hand::from_tiles(tiles),
            played: Vec::new(),
        }
    }

    /// Use one tile from the hand. Returns false when the hand was empty.
    pub fn play_tile(&mut self) -> bool {
        match self.hand.pop() {
            Some(tile) => {
                self.played.push(tile);
                true
            }
            None => false,
        }
    }

    /// Tiles held or played.
    pub fn tile_count(&self) -> usize {
        self.hand.len() + self.played.len()
    }
}

/// Per-opponent deadlines.
#[derive(Debug, Clone, Default)]
pub struct OpponentScheduler {
    timing: OpponentTiming,
    deadlines: Vec<Option<Instant>>,
}

impl OpponentScheduler {
    pub fn new(timing: OpponentTiming) -> Self {
        Self {
            timing,
            deadlines: Vec::new(),
        }
    }

    /// Start a fresh clock for every opponent. Empty hands get no deadline.
    pub fn arm<R: Rng + ?Sized>(&mut self, hand_sizes: &[usize], now: Instant, rng: &mut R) {
        self.deadlines = hand_sizes
            .iter()
            .map(|&size| (size > 0).then(|| now + self.timing.delay_for(size, rng)))
            .collect();
    }

    /// Restart one opponent's clock.
    pub fn reschedule<R: Rng + ?Sized>(
        &mut self,
        index: usize,
        hand_size: usize,
        now: Instant,
        rng: &mut R,
    ) {
        let deadline = (hand_size > 0).then(|| now + self.timing.delay_for(hand_size, rng));
        if let Some(slot) = self.deadlines.get_mut(index) {
            *slot = deadline;
        }
    }

    /// Drop every pending deadline.
    pub fn cancel_all(&mut self) {
        self.deadlines.clear();
    }

    /// Opponent with the earliest deadline at or before `now`. Ties go to
    /// the lower index. The returned opponent's deadline is cleared.
    pub fn next_due(&mut self, now: Instant) -> Option<usize> {
        let (index, _) = self
            .deadlines
            .iter()
            .copied()
            .enumerate()
            .filter_map(|(i, d)| d.map(|d| (i, d)))
            .filter(|&(_, d)| d <= now)
            .min_by_key(|&(i, d)| (d, i))?;
        self.deadlines[index] = None;
        Some(index)
    }

    pub fn is_idle(&self) -> bool {
        self.deadlines.iter().all(Option::is_none)
    }

    pub fn deadline(&self, index: usize) -> Option<Instant> {
        self.deadlines.get(index).copied().flatten()
    }
}
