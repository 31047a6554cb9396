//! Text rendering of game state for the terminal
//!
//! Everything renders into a `String`; callers decide where it goes. With
//! `ansi` enabled tiles are colorized, otherwise the output is plain ASCII
//! (filled wall cells upper case, empty ones lower case).

use std::fmt::Write;

use azul_engine::{
    Action, Color, DraftDestination, DraftSource, GameSnapshot, Phase, PlayerBoard, BOARD_SIZE,
    WALL_PATTERN,
};

// ANSI color codes for tile display
pub const BLUE: &str = "\x1b[94m";
pub const YELLOW: &str = "\x1b[93m";
pub const RED: &str = "\x1b[91m";
pub const BLACK: &str = "\x1b[90m";
pub const WHITE: &str = "\x1b[97m";
pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";

pub fn color_code(color: Color) -> &'static str {
    match color {
        Color::Blue => BLUE,
        Color::Yellow => YELLOW,
        Color::Red => RED,
        Color::Black => BLACK,
        Color::White => WHITE,
    }
}

pub fn color_char(color: Color) -> char {
    match color {
        Color::Blue => 'B',
        Color::Yellow => 'Y',
        Color::Red => 'R',
        Color::Black => 'K',
        Color::White => 'W',
    }
}

/// Terminal styling switch shared by the render functions
#[derive(Copy, Clone, Debug)]
pub struct Style {
    pub ansi: bool,
}

impl Style {
    pub const PLAIN: Style = Style { ansi: false };
    pub const ANSI: Style = Style { ansi: true };

    fn tile(self, color: Color) -> String {
        if self.ansi {
            format!("{}{}{}", color_code(color), color_char(color), RESET)
        } else {
            color_char(color).to_string()
        }
    }

    /// Empty wall cell, showing the color it is reserved for
    fn slot(self, color: Color) -> String {
        if self.ansi {
            format!("{DIM}{}{RESET}", color_char(color))
        } else {
            color_char(color).to_ascii_lowercase().to_string()
        }
    }

    fn dim(self, text: &str) -> String {
        if self.ansi {
            format!("{DIM}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn bold(self, text: &str) -> String {
        if self.ansi {
            format!("{BOLD}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}

/// Format an action in compact form, e.g. `F2 R -> L3` or `C K -> Floor`
pub fn format_action(action: &Action) -> String {
    let source = match action.source {
        DraftSource::Factory(f) => format!("F{f}"),
        DraftSource::Center => "C".to_string(),
    };
    let dest = match action.dest {
        DraftDestination::PatternLine(r) => format!("L{}", r + 1),
        DraftDestination::Floor => "Floor".to_string(),
    };
    format!("{} {} -> {}", source, color_char(action.color), dest)
}

fn tiles(style: Style, tiles: &[Color]) -> String {
    if tiles.is_empty() {
        return style.dim("(empty)");
    }
    tiles
        .iter()
        .map(|&c| style.tile(c))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render one player's pattern lines, wall and floor.
pub fn render_board(board: &PlayerBoard, player: usize, style: Style) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}",
        style.bold(&format!("PLAYER {} (Score: {})", player, board.score()))
    );

    for (row, line) in board.pattern_lines().iter().enumerate() {
        let cap = row + 1;
        out.push_str("  ");
        for _ in cap..BOARD_SIZE {
            out.push_str("  ");
        }
        for _ in line.len()..cap {
            out.push_str(&style.dim("."));
            out.push(' ');
        }
        if let Some(color) = line.color() {
            for _ in 0..line.len() {
                out.push_str(&style.tile(color));
                out.push(' ');
            }
        }

        out.push_str("-> ");
        let cells: Vec<String> = board.wall()[row]
            .iter()
            .zip(WALL_PATTERN[row])
            .map(|(cell, expected)| match cell {
                Some(c) => style.tile(*c),
                None => style.slot(expected),
            })
            .collect();
        let _ = writeln!(out, "{}", cells.join(" "));
    }

    let mut floor = tiles(style, board.floor());
    if board.has_first_player_token() {
        floor.push_str(" +1st");
    }
    let _ = writeln!(out, "  Floor: {floor}");
    out
}

/// Render the offers and every board of a snapshot.
pub fn render_snapshot(snapshot: &GameSnapshot, style: Style) -> String {
    let mut out = String::new();
    let status = match snapshot.phase {
        Phase::Ended => "game over".to_string(),
        _ => format!("player {} to move", snapshot.current_player),
    };
    let _ = writeln!(
        out,
        "{}",
        style.bold(&format!("Round {}: {}", snapshot.round, status))
    );

    for (i, factory) in snapshot.offers.factories().iter().enumerate() {
        let _ = writeln!(out, "  F{}: {}", i, tiles(style, factory.tiles()));
    }
    let token = if snapshot.offers.token_in_center() {
        " +1st"
    } else {
        ""
    };
    let _ = writeln!(
        out,
        "  C:  {}{}",
        tiles(style, snapshot.offers.center()),
        token
    );
    let _ = writeln!(
        out,
        "  Bag: {}  Discard: {}",
        snapshot.supply.bag_len(),
        snapshot.supply.discard_len()
    );

    for (p, board) in snapshot.boards.iter().enumerate() {
        out.push('\n');
        out.push_str(&render_board(board, p, style));
    }
    out
}
