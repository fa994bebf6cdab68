//! Game controller: the single owner of canonical game state
//!
//! The front-end reads [`Snapshot`]s and calls intent methods. Opponent
//! clocks advance only through [`Game::tick`], so opponent moves and player
//! intents are applied one at a time.

use crate::config::GameConfig;
use crate::error::{DictionaryError, GameError};
use crate::game::dictionary::DictionaryState;
use crate::game::opponents::{Opponent, OpponentScheduler};
use crate::game::pool::starting_tile_count;
use crate::game::validation::validate_board;
use crate::game::{
    normalize_letter, Arrow, Board, Cursor, Destination, Hand, MoveIntent, MoveOutcome, Position,
    Tile, TileId, TilePool, TypingDirection,
};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Instant;

/// Upper bound on participants, the human included.
pub const MAX_PLAYERS: usize = 8;

/// Tiles drawn back when dumping one.
pub const DUMP_DRAW: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameStatus {
    #[default]
    PreGame,
    InProgress,
    Won,
    Lost,
    /// Rotten banana: a bad grid submitted after the pool ran dry.
    Forfeited,
}

impl GameStatus {
    pub fn label(&self) -> &'static str {
        match self {
            GameStatus::PreGame => "Setup",
            GameStatus::InProgress => "Playing",
            GameStatus::Won => "Won",
            GameStatus::Lost => "Lost",
            GameStatus::Forfeited => "Rotten banana",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            GameStatus::Won | GameStatus::Lost | GameStatus::Forfeited
        )
    }
}

/// Read-only view of the game for rendering.
#[derive(Debug, Clone)]
pub struct Snapshot<'a> {
    pub status: GameStatus,
    pub board: &'a Board,
    pub hand: &'a Hand,
    pub opponent_hand_sizes: Vec<usize>,
    pub pool_size: usize,
    pub message: &'a str,
    pub selection: Option<Position>,
    pub typing_direction: TypingDirection,
    pub player_count: usize,
    pub last_opponent_peeler: Option<usize>,
    pub dictionary: String,
    pub dictionary_ready: bool,
}

/// Display label for an opponent index. The human is player 1.
pub fn opponent_label(index: usize) -> String {
    format!("Player {}", index + 2)
}

pub struct Game {
    config: GameConfig,
    status: GameStatus,
    player_count: usize,
    pool: TilePool,
    board: Board,
    hand: Hand,
    opponents: Vec<Opponent>,
    cursor: Cursor,
    scheduler: OpponentScheduler,
    dictionary: DictionaryState,
    message: String,
    last_opponent_peeler: Option<usize>,
    rng: StdRng,
    /// Time of the latest start or tick; stamps intents that re-arm clocks.
    clock: Instant,
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            status: GameStatus::PreGame,
            player_count: config.player_count.clamp(1, MAX_PLAYERS),
            pool: TilePool::default(),
            board: Board::new(config.board_size),
            hand: Hand::new(),
            opponents: Vec::new(),
            cursor: Cursor::default(),
            scheduler: OpponentScheduler::new(config.opponent_timing),
            dictionary: DictionaryState::NotLoaded,
            message: String::new(),
            last_opponent_peeler: None,
            rng,
            clock: Instant::now(),
            config,
        }
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    pub fn pool_size(&self) -> usize {
        self.pool.len()
    }

    pub fn opponents(&self) -> &[Opponent] {
        &self.opponents
    }

    pub fn player_count(&self) -> usize {
        self.player_count
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn scheduler(&self) -> &OpponentScheduler {
        &self.scheduler
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            status: self.status,
            board: &self.board,
            hand: &self.hand,
            opponent_hand_sizes: self.opponents.iter().map(|o| o.hand.len()).collect(),
            pool_size: self.pool.len(),
            message: &self.message,
            selection: self.cursor.selection,
            typing_direction: self.cursor.direction,
            player_count: self.player_count,
            last_opponent_peeler: self.last_opponent_peeler,
            dictionary: self.dictionary.label(),
            dictionary_ready: self.dictionary.is_ready(),
        }
    }

    /// Every tile in the game: pool, hands, board and opponents' played piles.
    pub fn tile_total(&self) -> usize {
        self.pool.len()
            + self.hand.len()
            + self.board.occupied_count()
            + self.opponents.iter().map(Opponent::tile_count).sum::<usize>()
    }

    // === Dictionary ===

    pub fn set_dictionary(&mut self, dictionary: DictionaryState) {
        self.dictionary = dictionary;
    }

    pub fn dictionary(&self) -> &DictionaryState {
        &self.dictionary
    }

    // === Setup ===

    pub fn set_player_count(&mut self, count: usize) -> Result<(), GameError> {
        let result = if self.status != GameStatus::PreGame {
            Err(GameError::AlreadyStarted)
        } else if !(1..=MAX_PLAYERS).contains(&count) {
            Err(GameError::InvalidPlayerCount { max: MAX_PLAYERS })
        } else {
            self.player_count = count;
            Ok(())
        };
        self.report(result)
    }

    /// Generate a fresh pool, deal hands and arm opponent clocks.
    pub fn start_game(&mut self, now: Instant) -> Result<(), GameError> {
        if self.status != GameStatus::PreGame {
            return self.report(Err(GameError::AlreadyStarted));
        }
        self.clock = now;

        let per_player = starting_tile_count(self.player_count);
        let deal = TilePool::generate_with_rng(&mut self.rng).deal_initial(self.player_count, per_player);
        self.pool = deal.pool;
        self.hand = Hand::from_tiles(deal.human);
        self.opponents = deal.opponents.into_iter().map(Opponent::new).collect();
        self.board = Board::new(self.config.board_size);
        self.cursor = Cursor::default();
        self.last_opponent_peeler = None;
        self.status = GameStatus::InProgress;
        self.message = format!("Game started. You have {} tiles.", self.hand.len());
        self.arm_opponents();

        info!(
            "Game started: {} players, {} tiles each, {} left in pool",
            self.player_count,
            per_player,
            self.pool.len()
        );
        debug!("Starting hand: {}", self.hand.as_string());
        Ok(())
    }

    /// Back to setup. Cancels every opponent clock; keeps the player count
    /// and dictionary.
    pub fn reset(&mut self) {
        self.scheduler.cancel_all();
        self.status = GameStatus::PreGame;
        self.pool = TilePool::default();
        self.board.clear();
        self.hand = Hand::new();
        self.opponents.clear();
        self.cursor = Cursor::default();
        self.last_opponent_peeler = None;
        self.message.clear();
        info!("Game reset");
    }

    // === Tile intents ===

    /// Drop a picked-up tile on the board or back in the hand.
    pub fn move_tile(
        &mut self,
        intent: MoveIntent,
        destination: Destination,
    ) -> Result<MoveOutcome, GameError> {
        let result = self
            .require_in_progress()
            .and_then(|_| intent.apply(&mut self.board, &mut self.hand, destination));
        let outcome = self.report(result)?;
        if outcome != MoveOutcome::Unchanged {
            self.message.clear();
            self.after_hand_change();
        }
        Ok(outcome)
    }

    /// Everyone draws one tile, the player first.
    pub fn peel(&mut self) -> Result<(), GameError> {
        let result = self.require_in_progress().and_then(|_| self.peel_for(None));
        self.report(result)
    }

    /// Trade one hand tile for three from the pool.
    pub fn dump(&mut self, tile: TileId) -> Result<(), GameError> {
        let result = self.require_in_progress().and_then(|_| self.dump_tile(tile));
        self.report(result)
    }

    /// Check the board for a win. Returns the new terminal status.
    pub fn check_win(&mut self) -> Result<GameStatus, GameError> {
        let result = self.require_in_progress().and_then(|_| self.judge_board());
        self.report(result)
    }

    /// Dump the first hand tile showing `letter`.
    pub fn dump_letter(&mut self, letter: char) -> Result<(), GameError> {
        let result = self.require_in_progress().and_then(|_| {
            let tile = self
                .hand
                .find_letter(letter)
                .ok_or_else(|| GameError::LetterNotInHand(normalize_letter(letter)))?;
            self.dump_tile(tile.id)
        });
        self.report(result)
    }

    /// Pick up the tile under the cursor for a later drop.
    pub fn pick_up(&mut self) -> Result<MoveIntent, GameError> {
        let result = self.require_in_progress().and_then(|_| {
            let pos = self.cursor.selection.ok_or(GameError::NoSelection)?;
            let tile = self.board.get(pos).ok_or(GameError::EmptyCell(pos))?;
            Ok(MoveIntent::from_board(*tile, pos))
        });
        self.report(result)
    }

    // === Cursor intents ===

    pub fn set_selection(&mut self, pos: Option<Position>) -> Result<(), GameError> {
        let result = self
            .require_in_progress()
            .and_then(|_| self.cursor.select(pos, &self.board));
        self.report(result)
    }

    pub fn move_selection(&mut self, arrow: Arrow) -> Result<(), GameError> {
        let result = self
            .require_in_progress()
            .map(|_| self.cursor.step(arrow, self.board.size()));
        self.report(result)
    }

    pub fn toggle_typing_direction(&mut self) -> Result<(), GameError> {
        let result = self
            .require_in_progress()
            .map(|_| self.cursor.toggle_direction());
        self.report(result)
    }

    pub fn place_by_letter(&mut self, letter: char) -> Result<MoveOutcome, GameError> {
        let result = self.require_in_progress().and_then(|_| {
            self.cursor
                .place_by_letter(letter, &mut self.board, &mut self.hand)
        });
        let outcome = self.report(result)?;
        self.message.clear();
        self.after_hand_change();
        Ok(outcome)
    }

    pub fn backspace(&mut self) -> Result<Option<Tile>, GameError> {
        let result = self
            .require_in_progress()
            .and_then(|_| self.cursor.backspace(&mut self.board, &mut self.hand));
        self.report(result)
    }

    // === Clock ===

    /// Advance to `now`: pick up a finished dictionary load and apply every
    /// opponent move that is due, earliest first. Returns true if anything
    /// changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if now > self.clock {
            self.clock = now;
        }
        let mut changed = self.dictionary.poll();

        while self.status == GameStatus::InProgress {
            let Some(index) = self.scheduler.next_due(now) else {
                break;
            };
            self.opponent_turn(index);
            changed = true;
        }
        changed
    }

    // === Internals ===

    fn report<T>(&mut self, result: Result<T, GameError>) -> Result<T, GameError> {
        if let Err(e) = &result {
            debug!("Rejected: {}", e);
            self.message = e.to_string();
        }
        result
    }

    fn require_in_progress(&self) -> Result<(), GameError> {
        if self.status == GameStatus::InProgress {
            Ok(())
        } else {
            Err(GameError::NotInProgress)
        }
    }

    fn arm_opponents(&mut self) {
        let sizes: Vec<usize> = self.opponents.iter().map(|o| o.hand.len()).collect();
        self.scheduler.arm(&sizes, self.clock, &mut self.rng);
    }

    /// Draw one tile for each participant while the pool lasts.
    fn peel_for(&mut self, peeler: Option<usize>) -> Result<(), GameError> {
        let Some(tile) = self.pool.draw_one() else {
            return Err(GameError::PoolEmpty);
        };
        self.hand.insert(tile);
        for opponent in &mut self.opponents {
            match self.pool.draw_one() {
                Some(tile) => opponent.hand.insert(tile),
                None => break,
            }
        }

        self.last_opponent_peeler = peeler;
        self.message = match peeler {
            Some(index) => format!("{} peeled!", opponent_label(index)),
            None => "Skala! Everyone draws a tile.".to_string(),
        };
        info!(
            "Peel by {}: {} tiles left",
            peeler.map(opponent_label).unwrap_or_else(|| "you".to_string()),
            self.pool.len()
        );
        self.arm_opponents();
        self.check_opponent_out();
        Ok(())
    }

    /// An opponent with no tiles left and nothing to draw has won the race.
    fn check_opponent_out(&mut self) -> bool {
        if !self.pool.is_empty() || self.status != GameStatus::InProgress {
            return false;
        }
        let Some(index) = self.opponents.iter().position(|o| o.hand.is_empty()) else {
            return false;
        };
        info!("{} finished first", opponent_label(index));
        self.finish(
            GameStatus::Lost,
            format!("{} used all their tiles. You lose!", opponent_label(index)),
        );
        true
    }

    fn dump_tile(&mut self, id: TileId) -> Result<(), GameError> {
        if self.pool.len() < DUMP_DRAW {
            return Err(GameError::NotEnoughToDump {
                available: self.pool.len(),
                needed: DUMP_DRAW,
            });
        }
        let tile = self.hand.remove(id).ok_or(GameError::TileNotInHand)?;
        self.pool.return_tile(tile);
        self.pool.shuffle(&mut self.rng);
        let drawn = self.pool.draw(DUMP_DRAW);
        self.hand.extend(drawn);
        self.message = format!("Dumped {}. Drew {} tiles.", tile.letter, DUMP_DRAW);
        info!("Dumped {}, {} tiles left in pool", tile.id, self.pool.len());
        Ok(())
    }

    fn judge_board(&mut self) -> Result<GameStatus, GameError> {
        if !self.hand.is_empty() {
            return Err(GameError::TilesRemaining {
                remaining: self.hand.len(),
            });
        }
        if self.board.is_empty() {
            return Err(GameError::BoardEmpty);
        }
        let verdict = match &self.dictionary {
            DictionaryState::Ready(words) => validate_board(&self.board, &**words),
            DictionaryState::Loading(_) => return Err(GameError::DictionaryLoading),
            DictionaryState::Failed(reason) => {
                return Err(GameError::DictionaryUnavailable(reason.clone()))
            }
            DictionaryState::NotLoaded => {
                return Err(GameError::DictionaryUnavailable(
                    DictionaryError::NoPath.to_string(),
                ))
            }
        };

        match verdict.into_result() {
            Ok(words) => {
                info!("Player won with {} words", words.len());
                self.finish(GameStatus::Won, "Bananagrams! You win!".to_string());
                Ok(GameStatus::Won)
            }
            Err(e) if e.is_board_defect() && self.pool.is_empty() => {
                info!("Rotten banana: {}", e);
                self.finish(GameStatus::Forfeited, format!("Rotten banana! {}", e));
                Ok(GameStatus::Forfeited)
            }
            Err(e) => Err(e),
        }
    }

    fn finish(&mut self, status: GameStatus, message: String) {
        self.scheduler.cancel_all();
        self.status = status;
        self.message = message;
    }

    /// Auto-peel when the hand runs out, or check for a win once the pool
    /// is empty too.
    fn after_hand_change(&mut self) {
        if self.status != GameStatus::InProgress || !self.hand.is_empty() {
            return;
        }
        if self.pool.is_empty() {
            // Rejections are already reported in the message.
            let _ = self.check_win();
        } else {
            let _ = self.peel();
        }
    }

    fn opponent_turn(&mut self, index: usize) {
        let Some(opponent) = self.opponents.get_mut(index) else {
            return;
        };
        if !opponent.play_tile() {
            return;
        }
        let remaining = opponent.hand.len();
        debug!("{} played a tile, {} left", opponent_label(index), remaining);

        if remaining > 0 {
            self.scheduler
                .reschedule(index, remaining, self.clock, &mut self.rng);
        } else if !self.check_opponent_out() {
            // Pool checked non-empty above.
            let _ = self.peel_for(Some(index));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::dictionary::{WordList, WordSet};
    use crate::game::opponents::OpponentTiming;
    use rand::Rng;
    use std::time::Duration;

    fn config(players: usize) -> GameConfig {
        GameConfig {
            board_size: 15,
            player_count: players,
            opponent_timing: OpponentTiming {
                base: Duration::from_millis(100),
                jitter: Duration::ZERO,
                last_tile_factor: 2.0,
            },
            seed: Some(7),
        }
    }

    fn ready(words: &[&str]) -> DictionaryState {
        let set: WordSet = words.iter().copied().collect();
        DictionaryState::Ready(Box::new(set))
    }

    fn started(players: usize) -> (Game, Instant) {
        let mut game = Game::new(config(players));
        let now = Instant::now();
        game.start_game(now).unwrap();
        (game, now)
    }

    /// Put a game into a fixed position: given hand, pool and board.
    fn rig(game: &mut Game, hand: &[(u32, char)], pool: &[(u32, char)]) {
        game.hand = Hand::from_tiles(hand.iter().map(|&(id, c)| Tile::new(id, c)).collect());
        game.pool = TilePool::from_tiles(pool.iter().map(|&(id, c)| Tile::new(id, c)).collect());
        game.board.clear();
    }

    fn lay_word(game: &mut Game, x: usize, y: usize, word: &str, across: bool, first_id: u32) {
        for (i, c) in word.chars().enumerate() {
            let pos = if across {
                Position::new(x + i, y)
            } else {
                Position::new(x, y + i)
            };
            game.board.set(pos, Some(Tile::new(first_id + i as u32, c)));
        }
    }

    #[test]
    fn test_start_deals_and_conserves() {
        let (game, _) = started(3);
        assert_eq!(game.status(), GameStatus::InProgress);
        assert_eq!(game.hand().len(), 21);
        assert_eq!(game.opponents().len(), 2);
        assert_eq!(game.pool_size(), 144 - 63);
        assert_eq!(game.tile_total(), 144);
        assert!(game.board().is_empty());
        assert!(!game.scheduler().is_idle());
    }

    #[test]
    fn test_solo_game_has_no_opponent_clocks() {
        let (game, _) = started(1);
        assert_eq!(game.status(), GameStatus::InProgress);
        assert_eq!(game.hand().len(), 21);
        assert_eq!(game.pool_size(), 123);
        assert!(game.board().is_empty());
        assert!(game.opponents().is_empty());
        assert!(game.scheduler().is_idle());
    }

    #[test]
    fn test_player_count_rules() {
        let mut game = Game::new(config(1));
        assert_eq!(
            game.set_player_count(9),
            Err(GameError::InvalidPlayerCount { max: MAX_PLAYERS })
        );
        assert_eq!(game.set_player_count(0), Err(GameError::InvalidPlayerCount { max: 8 }));
        game.set_player_count(6).unwrap();
        game.start_game(Instant::now()).unwrap();
        assert_eq!(game.hand().len(), 15);
        assert_eq!(game.set_player_count(2), Err(GameError::AlreadyStarted));
        assert_eq!(game.message(), GameError::AlreadyStarted.to_string());
    }

    #[test]
    fn test_eight_players_get_eleven() {
        let mut game = Game::new(config(8));
        game.start_game(Instant::now()).unwrap();
        assert_eq!(game.hand().len(), 11);
        assert!(game.opponents().iter().all(|o| o.hand.len() == 11));
        assert_eq!(game.pool_size(), 144 - 88);
    }

    #[test]
    fn test_intents_rejected_before_start() {
        let mut game = Game::new(config(1));
        assert_eq!(game.peel(), Err(GameError::NotInProgress));
        assert_eq!(game.check_win(), Err(GameError::NotInProgress));
        assert_eq!(game.move_selection(Arrow::Up), Err(GameError::NotInProgress));
        assert_eq!(game.message(), "Start a game first.");
    }

    #[test]
    fn test_peel_gives_everyone_a_tile() {
        let (mut game, _) = started(3);
        let before = game.pool_size();
        game.peel().unwrap();
        assert_eq!(game.hand().len(), 22);
        assert!(game.opponents().iter().all(|o| o.hand.len() == 22));
        assert_eq!(game.pool_size(), before - 3);
        assert_eq!(game.last_opponent_peeler, None);
        assert_eq!(game.tile_total(), 144);
    }

    #[test]
    fn test_peel_stops_when_pool_runs_out() {
        let (mut game, _) = started(3);
        game.pool = TilePool::from_tiles(vec![Tile::new(500, 'A'), Tile::new(501, 'B')]);
        let opp_sizes: Vec<usize> = game.opponents().iter().map(|o| o.hand.len()).collect();
        game.peel().unwrap();
        assert!(game.pool.is_empty());
        assert_eq!(game.hand().len(), 22);
        assert_eq!(game.opponents()[0].hand.len(), opp_sizes[0] + 1);
        assert_eq!(game.opponents()[1].hand.len(), opp_sizes[1]);
    }

    #[test]
    fn test_peel_empty_pool_is_message_only() {
        let (mut game, _) = started(1);
        game.pool = TilePool::default();
        let hand = game.hand().clone();
        assert_eq!(game.peel(), Err(GameError::PoolEmpty));
        assert_eq!(game.message(), "No more tiles to peel!");
        assert_eq!(game.hand(), &hand);
    }

    #[test]
    fn test_dump_trades_one_for_three() {
        let (mut game, _) = started(2);
        let tile = game.hand().tiles()[0];
        let pool_before = game.pool_size();
        game.dump(tile.id).unwrap();
        assert_eq!(game.hand().len(), 23);
        assert_eq!(game.pool_size(), pool_before - 2);
        assert_eq!(game.tile_total(), 144);
    }

    #[test]
    fn test_dump_needs_three_in_pool() {
        let (mut game, _) = started(1);
        rig(&mut game, &[(1, 'A')], &[(2, 'B'), (3, 'C')]);
        assert_eq!(
            game.dump(TileId(1)),
            Err(GameError::NotEnoughToDump { available: 2, needed: 3 })
        );
        assert_eq!(game.hand().len(), 1);
        assert_eq!(game.pool_size(), 2);
    }

    #[test]
    fn test_dump_unknown_tile() {
        let (mut game, _) = started(1);
        let total = game.tile_total();
        assert_eq!(game.dump(TileId(9999)), Err(GameError::TileNotInHand));
        assert_eq!(game.tile_total(), total);
    }

    #[test]
    fn test_dump_by_letter() {
        let (mut game, _) = started(1);
        rig(&mut game, &[(1, 'Ö'), (2, 'A')], &[(3, 'B'), (4, 'C'), (5, 'D')]);
        let total = game.tile_total();
        assert_eq!(game.dump_letter('q'), Err(GameError::LetterNotInHand('Q')));
        game.dump_letter('ö').unwrap();
        // The Ö is shuffled back into the pool and may be drawn again.
        assert_eq!(game.hand().len(), 4);
        assert_eq!(game.pool_size(), 1);
        assert_eq!(game.tile_total(), total);
        assert!(game.message().starts_with("Dumped Ö."));
    }

    #[test]
    fn test_pick_up_and_drop_moves_tile() {
        let (mut game, _) = started(1);
        assert_eq!(game.pick_up(), Err(GameError::NoSelection));
        game.set_selection(Some(Position::new(2, 2))).unwrap();
        assert_eq!(game.pick_up(), Err(GameError::EmptyCell(Position::new(2, 2))));

        let letter = game.hand().tiles()[0].letter;
        game.place_by_letter(letter).unwrap();
        game.set_selection(Some(Position::new(2, 2))).unwrap();
        let intent = game.pick_up().unwrap();
        game.move_tile(intent, Destination::At(Position::new(9, 9)))
            .unwrap();
        assert!(game.board().get(Position::new(2, 2)).is_none());
        assert_eq!(game.board().get(Position::new(9, 9)).map(|t| t.letter), Some(letter));
    }

    #[test]
    fn test_move_to_same_cell_is_noop() {
        let (mut game, _) = started(1);
        let tile = game.hand().tiles()[0];
        let pos = Position::new(3, 3);
        game.move_tile(MoveIntent::from_hand(tile), Destination::At(pos))
            .unwrap();
        let board = game.board().clone();
        let outcome = game
            .move_tile(MoveIntent::from_board(tile, pos), Destination::At(pos))
            .unwrap();
        assert_eq!(outcome, MoveOutcome::Unchanged);
        assert_eq!(game.board(), &board);
    }

    #[test]
    fn test_stale_move_rejected() {
        let (mut game, _) = started(1);
        let tile = game.hand().tiles()[0];
        let result = game.move_tile(
            MoveIntent::from_board(tile, Position::new(0, 0)),
            Destination::Hand,
        );
        assert_eq!(result, Err(GameError::StaleMove(Position::new(0, 0))));
        assert_eq!(game.tile_total(), 144);
    }

    #[test]
    fn test_auto_peel_when_hand_empties() {
        let (mut game, _) = started(1);
        rig(&mut game, &[(1, 'A')], &[(2, 'B'), (3, 'C')]);
        game.set_selection(Some(Position::new(5, 5))).unwrap();
        game.place_by_letter('a').unwrap();
        assert_eq!(game.hand().len(), 1);
        assert_eq!(game.pool_size(), 1);
        assert_eq!(game.status(), GameStatus::InProgress);
    }

    #[test]
    fn test_win_with_valid_grid() {
        let (mut game, _) = started(2);
        game.set_dictionary(ready(&["bat", "car"]));
        rig(&mut game, &[], &[]);
        lay_word(&mut game, 1, 2, "BAT", true, 900);
        game.board.set(Position::new(2, 1), Some(Tile::new(910, 'C')));
        game.board.set(Position::new(2, 3), Some(Tile::new(911, 'R')));

        assert_eq!(game.check_win(), Ok(GameStatus::Won));
        assert_eq!(game.message(), "Bananagrams! You win!");
        assert!(game.scheduler().is_idle());
    }

    #[test]
    fn test_invalid_word_with_pool_left() {
        let (mut game, _) = started(1);
        game.set_dictionary(ready(&["bat"]));
        rig(&mut game, &[], &[(1, 'E')]);
        lay_word(&mut game, 0, 0, "XYZ", true, 900);
        assert_eq!(
            game.check_win(),
            Err(GameError::InvalidWords(vec!["XYZ".to_string()]))
        );
        assert_eq!(game.status(), GameStatus::InProgress);
        assert_eq!(game.message(), "Invalid words: XYZ");
    }

    #[test]
    fn test_invalid_word_with_empty_pool_forfeits() {
        let (mut game, _) = started(2);
        game.set_dictionary(ready(&["bat"]));
        rig(&mut game, &[], &[]);
        lay_word(&mut game, 0, 0, "XYZ", true, 900);
        assert_eq!(game.check_win(), Ok(GameStatus::Forfeited));
        assert!(game.message().starts_with("Rotten banana!"));
        assert!(game.scheduler().is_idle());
    }

    #[test]
    fn test_disconnected_grid_follows_invalid_branch() {
        let (mut game, _) = started(1);
        game.set_dictionary(ready(&["bat", "is"]));
        rig(&mut game, &[], &[(1, 'E')]);
        lay_word(&mut game, 0, 0, "BAT", true, 900);
        lay_word(&mut game, 6, 6, "IS", true, 910);
        assert_eq!(game.check_win(), Err(GameError::Disconnected));

        game.pool = TilePool::default();
        assert_eq!(game.check_win(), Ok(GameStatus::Forfeited));
    }

    #[test]
    fn test_no_words_is_message_only() {
        let (mut game, _) = started(1);
        game.set_dictionary(ready(&["bat"]));
        rig(&mut game, &[], &[]);
        game.board.set(Position::new(4, 4), Some(Tile::new(900, 'A')));
        assert_eq!(game.check_win(), Err(GameError::NoWords));
        assert_eq!(game.status(), GameStatus::InProgress);
    }

    #[test]
    fn test_win_check_preconditions() {
        let (mut game, _) = started(1);
        game.set_dictionary(ready(&["bat"]));
        assert_eq!(
            game.check_win(),
            Err(GameError::TilesRemaining { remaining: 21 })
        );
        rig(&mut game, &[], &[]);
        assert_eq!(game.check_win(), Err(GameError::BoardEmpty));
    }

    #[test]
    fn test_win_check_fails_closed_without_dictionary() {
        let (mut game, _) = started(1);
        rig(&mut game, &[], &[]);
        lay_word(&mut game, 0, 0, "BAT", true, 900);
        assert!(matches!(
            game.check_win(),
            Err(GameError::DictionaryUnavailable(_))
        ));

        game.set_dictionary(DictionaryState::Failed("could not read x".to_string()));
        assert_eq!(
            game.check_win(),
            Err(GameError::DictionaryUnavailable("could not read x".to_string()))
        );
        assert!(game.message().starts_with("Error checking words."));
        assert_eq!(game.status(), GameStatus::InProgress);
    }

    #[test]
    fn test_placing_last_tile_with_empty_pool_checks_win() {
        let (mut game, _) = started(1);
        game.set_dictionary(ready(&["bat"]));
        rig(&mut game, &[(3, 'T')], &[]);
        lay_word(&mut game, 0, 0, "BA", true, 900);
        game.set_selection(Some(Position::new(2, 0))).unwrap();
        game.place_by_letter('t').unwrap();
        assert_eq!(game.status(), GameStatus::Won);
    }

    #[test]
    fn test_backspace_returns_tile() {
        let (mut game, _) = started(1);
        game.set_selection(Some(Position::new(0, 0))).unwrap();
        let letter = game.hand().tiles()[0].letter;
        game.place_by_letter(letter).unwrap();
        assert_eq!(game.cursor().selection, Some(Position::new(1, 0)));
        // Cursor now on an empty cell: only steps back.
        assert_eq!(game.backspace(), Ok(None));
        assert_eq!(game.cursor().selection, Some(Position::new(0, 0)));
        let removed = game.backspace().unwrap();
        assert_eq!(removed.map(|t| t.letter), Some(letter));
        assert_eq!(game.hand().len(), 21);
        assert!(game.board().is_empty());
    }

    #[test]
    fn test_toggle_direction_and_arrows() {
        let (mut game, _) = started(1);
        game.move_selection(Arrow::Left).unwrap();
        assert_eq!(game.cursor().selection, Some(Position::new(7, 7)));
        game.toggle_typing_direction().unwrap();
        assert_eq!(game.snapshot().typing_direction, TypingDirection::Vertical);
        assert_eq!(
            game.set_selection(Some(Position::new(15, 0))),
            Err(GameError::OffBoard(Position::new(15, 0)))
        );
    }

    #[test]
    fn test_opponent_plays_on_tick() {
        let (mut game, now) = started(2);
        assert!(!game.tick(now));
        assert!(game.tick(now + Duration::from_millis(100)));
        assert_eq!(game.opponents()[0].hand.len(), 20);
        assert_eq!(game.opponents()[0].played.len(), 1);
        assert_eq!(game.tile_total(), 144);
    }

    #[test]
    fn test_opponent_finishing_on_empty_pool_loses() {
        let (mut game, now) = started(3);
        game.pool = TilePool::default();
        game.opponents[1].hand = Hand::from_tiles(vec![Tile::new(800, 'A')]);
        game.opponents[0].hand = Hand::from_tiles(vec![Tile::new(801, 'B'), Tile::new(802, 'C')]);
        game.arm_opponents();
        // Final tile: 100 ms x 2.0
        game.tick(now + Duration::from_millis(150));
        assert_eq!(game.status(), GameStatus::InProgress);
        game.tick(now + Duration::from_millis(200));
        assert_eq!(game.status(), GameStatus::Lost);
        assert_eq!(game.message(), "Player 3 used all their tiles. You lose!");
        assert!(game.scheduler().is_idle());

        // Human intents are closed once the game is over.
        assert_eq!(game.peel(), Err(GameError::NotInProgress));
    }

    #[test]
    fn test_opponent_out_when_its_peel_drains_pool() {
        let (mut game, now) = started(3);
        game.pool = TilePool::from_tiles(vec![Tile::new(700, 'E')]);
        game.opponents[1].hand = Hand::from_tiles(vec![Tile::new(800, 'A')]);
        game.arm_opponents();
        game.tick(now + Duration::from_millis(200));
        // The human drew the last tile, leaving Player 3 with nothing.
        assert!(game.hand().contains(TileId(700)));
        assert!(game.opponents()[1].hand.is_empty());
        assert_eq!(game.pool_size(), 0);
        assert_eq!(game.status(), GameStatus::Lost);
        assert_eq!(game.message(), "Player 3 used all their tiles. You lose!");
        assert!(game.scheduler().is_idle());
    }

    #[test]
    fn test_opponent_finishing_with_pool_left_peels() {
        let (mut game, now) = started(2);
        game.opponents[0].hand = Hand::from_tiles(vec![Tile::new(800, 'A')]);
        let hand_before = game.hand().len();
        let pool_before = game.pool_size();
        game.arm_opponents();
        game.tick(now + Duration::from_millis(200));
        assert_eq!(game.status(), GameStatus::InProgress);
        assert_eq!(game.last_opponent_peeler, Some(0));
        assert_eq!(game.message(), "Player 2 peeled!");
        assert_eq!(game.hand().len(), hand_before + 1);
        assert_eq!(game.opponents()[0].hand.len(), 1);
        assert_eq!(game.pool_size(), pool_before - 2);
        assert!(game.scheduler().deadline(0).is_some());
    }

    #[test]
    fn test_stale_timers_after_reset_do_nothing() {
        let (mut game, now) = started(4);
        game.reset();
        assert_eq!(game.status(), GameStatus::PreGame);
        assert!(game.scheduler().is_idle());
        assert!(!game.tick(now + Duration::from_secs(3600)));
        assert_eq!(game.tile_total(), 0);
        assert_eq!(game.player_count(), 4);

        // A new game arms fresh clocks that start from the new start time.
        let later = now + Duration::from_secs(10);
        game.start_game(later).unwrap();
        assert!(!game.tick(later + Duration::from_millis(50)));
        assert_eq!(game.tile_total(), 144);
    }

    #[test]
    fn test_dictionary_polled_on_tick() {
        let mut game = Game::new(config(1));
        let path = std::env::temp_dir().join(format!("skala-game-{}.txt", std::process::id()));
        std::fs::write(&path, "bat\n").unwrap();
        game.set_dictionary(DictionaryState::Loading(
            crate::game::dictionary::DictionaryLoader::spawn(path.clone()),
        ));
        let start = Instant::now();
        while !game.snapshot().dictionary_ready && start.elapsed() < Duration::from_secs(5) {
            game.tick(Instant::now());
            std::thread::sleep(Duration::from_millis(5));
        }
        match game.dictionary() {
            DictionaryState::Ready(words) => assert!(words.contains("BAT")),
            _ => panic!("Expected dictionary to be ready"),
        }
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_conservation_over_random_play() {
        let (mut game, start) = started(4);
        game.set_dictionary(ready(&["ab"]));
        let mut rng = StdRng::seed_from_u64(99);
        let mut now = start;

        for _ in 0..400 {
            if game.status() != GameStatus::InProgress {
                break;
            }
            match rng.random_range(0..6) {
                0 => {
                    let _ = game.peel();
                }
                1 => {
                    if let Some(tile) = game.hand().tiles().first().copied() {
                        let _ = game.dump(tile.id);
                    }
                }
                2 => {
                    if let Some(tile) = game.hand().tiles().last().copied() {
                        let pos = Position::new(rng.random_range(0..15), rng.random_range(0..15));
                        let _ = game.move_tile(MoveIntent::from_hand(tile), Destination::At(pos));
                    }
                }
                3 => {
                    let placed: Vec<(Position, Tile)> =
                        game.board().occupied().map(|(p, t)| (p, *t)).collect();
                    if let Some(&(from, tile)) = placed.first() {
                        let to = Position::new(rng.random_range(0..15), rng.random_range(0..15));
                        let _ = game.move_tile(MoveIntent::from_board(tile, from), Destination::At(to));
                        let _ = game.move_tile(MoveIntent::from_board(tile, to), Destination::Hand);
                    }
                }
                4 => {
                    now += Duration::from_millis(rng.random_range(0..300));
                    game.tick(now);
                }
                _ => {
                    let _ = game.check_win();
                }
            }
            assert_eq!(game.tile_total(), 144);
        }
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let (game, _) = started(3);
        let snap = game.snapshot();
        assert_eq!(snap.status, GameStatus::InProgress);
        assert_eq!(snap.opponent_hand_sizes, vec![21, 21]);
        assert_eq!(snap.pool_size, 81);
        assert_eq!(snap.player_count, 3);
        assert_eq!(snap.dictionary, "not loaded");
        assert!(!snap.dictionary_ready);
    }
}
