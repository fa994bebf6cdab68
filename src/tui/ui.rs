//! UI rendering using ratatui
//!
//! Screens:
//! - Setup: player count and key help
//! - Playing: board, hand, opponents and messages
//! - Over: the final board with the result

use crate::app::{opponent_label, AppCoordinator, GameStatus, InputMode, Screen, Snapshot, MAX_PLAYERS};
use crate::game::{Board, Hand, Origin, Position, TypingDirection};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

/// Render the appropriate screen based on game state
pub fn render(frame: &mut Frame, app: &AppCoordinator) {
    let snapshot = app.game.snapshot();
    match app.screen() {
        Screen::Setup => render_setup(frame, &snapshot),
        Screen::Playing | Screen::Over => render_game(frame, &snapshot, app.mode),
    }
}

fn render_setup(frame: &mut Frame, snap: &Snapshot) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8), // Logo
            Constraint::Length(2), // Player count
            Constraint::Length(1), // Dictionary
            Constraint::Length(1), // Message
            Constraint::Min(4),    // Help
            Constraint::Length(2), // Footer
        ])
        .margin(2)
        .split(area);

    let logo = r#"
 ____  _  __    _    _        _
/ ___|| |/ /   / \  | |      / \
\___ \| ' /   / _ \ | |     / _ \
 ___) | . \  / ___ \| |___ / ___ \
|____/|_|\_\/_/   \_\_____/_/   \_\
"#;
    let logo_widget = Paragraph::new(logo)
        .style(Style::default().fg(Color::Yellow).bold())
        .alignment(Alignment::Center);
    frame.render_widget(logo_widget, layout[0]);

    let players = Paragraph::new(format!(
        "Players: {}  (press 1-{} to change)",
        snap.player_count, MAX_PLAYERS
    ))
    .style(Style::default().fg(Color::Cyan).bold())
    .alignment(Alignment::Center);
    frame.render_widget(players, layout[1]);

    let dictionary = Paragraph::new(format!("Dictionary: {}", snap.dictionary))
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(dictionary, layout[2]);

    let (text, color) = format_message(snap.message, snap.status);
    frame.render_widget(
        Paragraph::new(text)
            .style(Style::default().fg(color))
            .alignment(Alignment::Center),
        layout[3],
    );

    let help: Vec<ListItem> = HELP
        .iter()
        .map(|(key, what)| ListItem::new(format!("{:>10}  {}", key, what)))
        .collect();
    let help = List::new(help).block(Block::default().borders(Borders::TOP).title("Keys"));
    frame.render_widget(help, layout[4]);

    let footer = Paragraph::new("Enter Start  Esc Quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(footer, layout[5]);
}

const HELP: [(&str, &str); 10] = [
    ("Arrows", "Move the cursor"),
    ("A-Ö", "Place a tile from your hand"),
    ("Backspace", "Take back the tile under the cursor"),
    ("Tab", "Switch typing direction"),
    ("Space", "Skala (peel)"),
    ("Ctrl+D", "Dump: next letter is traded for three"),
    ("Ctrl+X", "Pick up / drop a board tile"),
    ("Delete", "Return the tile under the cursor"),
    ("Enter", "Check your board"),
    ("Ctrl+R", "Back to setup"),
];

fn render_game(frame: &mut Frame, snap: &Snapshot, mode: InputMode) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Board and side panel
            Constraint::Length(3), // Hand
            Constraint::Length(2), // Message
        ])
        .split(area);

    render_header(frame, layout[0], snap, mode);

    let board_width = (snap.board.size() * 2 + 2) as u16;
    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(board_width), Constraint::Min(20)])
        .split(layout[1]);

    let carried = match mode {
        InputMode::Carrying(intent) => match intent.origin {
            Origin::At(pos) => Some(pos),
            Origin::Hand => None,
        },
        _ => None,
    };
    render_board(frame, middle[0], snap.board, snap.selection, carried);
    render_side_panel(frame, middle[1], snap);
    render_hand(frame, layout[2], snap.hand);

    let (text, color) = format_message(snap.message, snap.status);
    let hint = if snap.status.is_terminal() {
        "  (Enter: new game)"
    } else {
        ""
    };
    frame.render_widget(
        Paragraph::new(format!("{}{}", text, hint)).style(Style::default().fg(color).bold()),
        layout[3],
    );
}

/// Header: logo | status | typing direction and input mode
fn render_header(frame: &mut Frame, area: Rect, snap: &Snapshot, mode: InputMode) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(Color::DarkGray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let header_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(10),
            Constraint::Min(20),
            Constraint::Length(24),
        ])
        .split(inner);

    frame.render_widget(
        Paragraph::new("SKALA")
            .style(Style::default().fg(Color::Yellow).bold())
            .alignment(Alignment::Left),
        header_layout[0],
    );

    let status_color = match snap.status {
        GameStatus::Won => Color::Green,
        GameStatus::Lost | GameStatus::Forfeited => Color::Red,
        _ => Color::Cyan,
    };
    frame.render_widget(
        Paragraph::new(format!("{}  |  Pool: {}", snap.status.label(), snap.pool_size))
            .style(Style::default().fg(status_color).bold())
            .alignment(Alignment::Center),
        header_layout[1],
    );

    frame.render_widget(
        Paragraph::new(format!("{} {}", mode.label(), direction_arrow(snap)))
            .style(Style::default().fg(Color::Magenta))
            .alignment(Alignment::Right),
        header_layout[2],
    );
}

fn direction_arrow(snap: &Snapshot) -> String {
    let arrow = match snap.typing_direction {
        TypingDirection::Horizontal => "→",
        TypingDirection::Vertical => "↓",
    };
    format!("{} {}", arrow, snap.typing_direction.label())
}

fn render_board(
    frame: &mut Frame,
    area: Rect,
    board: &Board,
    selection: Option<Position>,
    carried: Option<Position>,
) {
    let lines: Vec<Line> = (0..board.size())
        .map(|y| {
            let spans: Vec<Span> = (0..board.size())
                .map(|x| {
                    let pos = Position::new(x, y);
                    let tile = board.get(pos);
                    let text = match tile {
                        Some(t) => format!("{} ", t.letter),
                        None => "· ".to_string(),
                    };
                    let mut style = if tile.is_some() {
                        Style::default().fg(Color::Yellow).bold()
                    } else {
                        Style::default().fg(Color::DarkGray)
                    };
                    if carried == Some(pos) {
                        style = style.fg(Color::Magenta);
                    }
                    if selection == Some(pos) {
                        style = style.reversed();
                    }
                    Span::styled(text, style)
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    let board_widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title("Board"),
    );
    frame.render_widget(board_widget, area);
}

/// Opponents, dictionary state and the cursor position
fn render_side_panel(frame: &mut Frame, area: Rect, snap: &Snapshot) {
    let mut items: Vec<ListItem> = vec![ListItem::new(format!("Player 1 (you): {}", snap.hand.len()))
        .style(Style::default().fg(Color::Cyan).bold())];

    items.extend(snap.opponent_hand_sizes.iter().enumerate().map(|(i, size)| {
        let style = if snap.last_opponent_peeler == Some(i) {
            Style::default().fg(Color::Yellow)
        } else if *size <= 2 {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::White)
        };
        ListItem::new(format!("{}: {} tiles", opponent_label(i), size)).style(style)
    }));

    items.push(ListItem::new(""));
    items.push(
        ListItem::new(format!("Dictionary: {}", snap.dictionary)).style(if snap.dictionary_ready {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        }),
    );
    if let Some(pos) = snap.selection {
        items.push(
            ListItem::new(format!("Cursor: {}, {}", pos.x + 1, pos.y + 1))
                .style(Style::default().fg(Color::DarkGray)),
        );
    }

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title("Players"),
    );
    frame.render_widget(list, area);
}

fn render_hand(frame: &mut Frame, area: Rect, hand: &Hand) {
    let hand_widget = Paragraph::new(format_hand(hand))
        .style(Style::default().fg(Color::Cyan).bold())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(format!("Hand ({})", hand.len())),
        );
    frame.render_widget(hand_widget, area);
}

/// Hand letters in alphabetical order, space separated
fn format_hand(hand: &Hand) -> String {
    if hand.is_empty() {
        return String::from("[ empty ]");
    }
    let mut letters: Vec<char> = hand.tiles().iter().map(|t| t.letter).collect();
    letters.sort_by_key(|c| alphabet_index(*c));
    letters
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Swedish alphabetical order: Å, Ä and Ö come after Z.
fn alphabet_index(letter: char) -> u32 {
    match letter {
        'Å' => 'Z' as u32 + 1,
        'Ä' => 'Z' as u32 + 2,
        'Ö' => 'Z' as u32 + 3,
        c => c as u32,
    }
}

/// Message text with a colour for its kind
fn format_message(message: &str, status: GameStatus) -> (String, Color) {
    let color = match status {
        GameStatus::Won => Color::Green,
        GameStatus::Lost | GameStatus::Forfeited => Color::Red,
        _ if message.ends_with("peeled!") || message.starts_with("Skala!") => Color::Yellow,
        _ if message.starts_with("Invalid")
            || message.starts_with("Error")
            || message.starts_with("No ")
            || message.starts_with("Not enough") =>
        {
            Color::Red
        }
        _ => Color::White,
    };
    (message.to_string(), color)
}
