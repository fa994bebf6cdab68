//! Command-line options and game configuration

use crate::app::MAX_PLAYERS;
use crate::game::opponents::OpponentTiming;
use crate::game::DEFAULT_BOARD_SIZE;
use clap::Parser;
use directories::ProjectDirs;
use std::path::PathBuf;
use std::time::Duration;

/// Default word list file name inside the data directory.
pub const DEFAULT_WORD_LIST: &str = "saol2018clean.csv";

/// Accepted board side lengths.
pub const BOARD_SIZE_RANGE: std::ops::RangeInclusive<usize> = 5..=60;

/// Accepted final-tile slowdown factors.
pub const LAST_TILE_FACTOR_RANGE: std::ops::RangeInclusive<f64> = 0.0..=10.0;

/// Settings that shape one session.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub board_size: usize,
    pub player_count: usize,
    pub opponent_timing: OpponentTiming,
    /// Fixed RNG seed; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_BOARD_SIZE,
            player_count: 1,
            opponent_timing: OpponentTiming::default(),
            seed: None,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "skala", about = "Swedish Bananagrams in the terminal")]
pub struct Cli {
    /// Number of players including you (1-8)
    #[arg(short = 'p', long, default_value_t = 1)]
    pub players: usize,

    /// Word list file (plain list or SAOL CSV)
    #[arg(short = 'w', long)]
    pub words: Option<PathBuf>,

    /// Side length of the square board (5-60)
    #[arg(long, default_value_t = DEFAULT_BOARD_SIZE)]
    pub board_size: usize,

    /// Fixed seed for the tile shuffle and opponent timing
    #[arg(long)]
    pub seed: Option<u64>,

    /// Minimum opponent delay between tiles, in milliseconds
    #[arg(long, default_value_t = 4000)]
    pub opponent_base_ms: u64,

    /// Maximum extra random opponent delay, in milliseconds
    #[arg(long, default_value_t = 3000)]
    pub opponent_jitter_ms: u64,

    /// Slowdown factor before an opponent's final tile (0-10)
    #[arg(long, default_value_t = 2.5)]
    pub last_tile_factor: f64,

    /// Append logs to this file instead of the data directory
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            board_size: self
                .board_size
                .clamp(*BOARD_SIZE_RANGE.start(), *BOARD_SIZE_RANGE.end()),
            player_count: self.players.clamp(1, MAX_PLAYERS),
            opponent_timing: OpponentTiming {
                base: Duration::from_millis(self.opponent_base_ms),
                jitter: Duration::from_millis(self.opponent_jitter_ms),
                last_tile_factor: self.last_tile_factor(),
            },
            seed: self.seed,
        }
    }

    /// Clamped into range; NaN falls back to the default.
    fn last_tile_factor(&self) -> f64 {
        if self.last_tile_factor.is_nan() {
            return OpponentTiming::default().last_tile_factor;
        }
        self.last_tile_factor
            .clamp(*LAST_TILE_FACTOR_RANGE.start(), *LAST_TILE_FACTOR_RANGE.end())
    }

    /// Explicit word list, else the default file in the data directory.
    pub fn word_list_path(&self) -> Option<PathBuf> {
        self.words
            .clone()
            .or_else(|| project_dirs().map(|dirs| dirs.data_dir().join(DEFAULT_WORD_LIST)))
    }

    /// Explicit log file, else `skala.log` in the local data directory.
    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file
            .clone()
            .or_else(|| project_dirs().map(|dirs| dirs.data_local_dir().join("skala.log")))
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "skala")
}
