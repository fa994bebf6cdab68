//! Skala - Swedish Bananagrams in the terminal
//!
//! Race the simulated players to a finished crossword grid.

mod app;
mod config;
mod error;
mod game;
mod tui;

use app::{AppCoordinator, Game, Screen};
use clap::Parser;
use config::Cli;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use game::dictionary::{DictionaryLoader, DictionaryState};
use game::{is_game_letter, Arrow};
use log::{info, warn};
use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use std::time::{Duration, Instant};
use tui::Tui;

/// Send logs to a file; the terminal belongs to the UI.
fn init_logging(log_file: Option<&Path>) {
    let Some(path) = log_file else {
        return;
    };
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => {
            let _ = env_logger::Builder::new()
                .filter_level(log::LevelFilter::Info)
                .parse_default_env()
                .target(env_logger::Target::Pipe(Box::new(file)))
                .try_init();
        }
        Err(e) => eprintln!("Could not open log file {}: {}", path.display(), e),
    }
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_path().as_deref());

    let mut game = Game::new(cli.game_config());
    match cli.word_list_path() {
        Some(path) => game.set_dictionary(DictionaryState::Loading(DictionaryLoader::spawn(path))),
        None => warn!("No data directory and no --words given; win checks are disabled"),
    }
    let mut app = AppCoordinator::new(game);
    info!("Skala starting with {} players", app.game.player_count());

    // Initialize terminal
    let mut terminal = Tui::new()?;
    terminal.enter()?;

    // Opponent clocks are checked at least this often
    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| tui::render(frame, &app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (not release)
                if key.kind == KeyEventKind::Press {
                    handle_key(&mut app, key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.poll(Instant::now());
            last_tick = Instant::now();
        }

        if app.should_quit {
            break;
        }
    }

    info!("Skala exiting");
    // Terminal cleanup happens automatically via Tui::drop
    Ok(())
}

fn handle_key(app: &mut AppCoordinator, key: KeyEvent) {
    let now = Instant::now();
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match (key.code, ctrl) {
        (KeyCode::Char('c'), true) => app.quit(),
        (KeyCode::Char('r'), true) => app.reset(),
        (KeyCode::Esc, _) => app.escape(),
        (KeyCode::Enter, _) => app.confirm(now),
        _ => match app.screen() {
            Screen::Setup => {
                if let KeyCode::Char(c) = key.code {
                    if let Some(digit) = c.to_digit(10) {
                        app.setup_digit(digit);
                    }
                }
            }
            Screen::Playing => handle_playing_key(app, key.code, ctrl),
            Screen::Over => {}
        },
    }
}

fn handle_playing_key(app: &mut AppCoordinator, code: KeyCode, ctrl: bool) {
    match (code, ctrl) {
        (KeyCode::Char('d'), true) => app.begin_dump(),
        (KeyCode::Char('x'), true) => app.carry(),
        (KeyCode::Up, _) => app.arrow(Arrow::Up),
        (KeyCode::Down, _) => app.arrow(Arrow::Down),
        (KeyCode::Left, _) => app.arrow(Arrow::Left),
        (KeyCode::Right, _) => app.arrow(Arrow::Right),
        (KeyCode::Tab, _) => app.toggle_direction(),
        (KeyCode::Backspace, _) => app.backspace(),
        (KeyCode::Delete, _) => app.return_to_hand(),
        (KeyCode::Char(' '), false) => app.peel(),
        (KeyCode::Char(c), false) if is_game_letter(c) => app.letter(c),
        _ => {}
    }
}
