//! Azul Game Engine
//!
//! A rule engine for the board game Azul: tile supply, factory displays and
//! the center pool, per-player boards with their scoring rules, and the
//! round/turn state machine that ties them together.
//!
//! The engine is single-threaded and exclusively owns all of its state. A
//! presentation layer drives it through [`GameEngine`] commands and reads it
//! back through queries and [`GameEvent`] notifications.

use std::fmt;

use serde::{Deserialize, Serialize};

mod board;
mod config;
mod error;
mod events;
mod game;
mod offers;
mod supply;

pub use board::*;
pub use config::*;
pub use error::*;
pub use events::*;
pub use game::*;
pub use offers::*;
pub use supply::*;

// =============================================================================
// Basic types and constants
// =============================================================================

/// Index into the players of a game: 0..num_players-1
pub type PlayerIdx = usize;

/// Row index (0..=4)
pub type Row = u8;

/// Column index (0..=4)
pub type Col = u8;

pub const BOARD_SIZE: usize = 5;
pub const MIN_PLAYERS: u8 = 2;
pub const MAX_PLAYERS: u8 = 4;
pub const FACTORY_CAPACITY: usize = 4;
pub const FLOOR_CAPACITY: usize = 7;
pub const TILE_COLORS: usize = 5;
pub const TILES_PER_COLOR: u8 = 20;
pub const TOTAL_TILES: usize = TILE_COLORS * TILES_PER_COLOR as usize;

/// Floor penalties (fixed table), applied positionally to the first
/// `FLOOR_CAPACITY` floor tiles.
pub const FLOOR_PENALTY: [i8; FLOOR_CAPACITY] = [-1, -1, -2, -2, -2, -3, -3];

/// Extra deduction for holding the first player token at round end.
pub const FIRST_PLAYER_PENALTY: u16 = 1;

/// End-game bonus per complete horizontal row.
pub const ROW_BONUS: u16 = 2;
/// End-game bonus per complete vertical column.
pub const COLUMN_BONUS: u16 = 7;
/// End-game bonus per color with all five of its wall cells filled.
pub const COLOR_BONUS: u16 = 10;

/// Tile colors (order fixed: it is also the enumeration order used by
/// `legal_actions` and `available_colors`)
#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Color {
    Blue = 0,
    Yellow = 1,
    Red = 2,
    Black = 3,
    White = 4,
}

impl Color {
    /// Convert from u8 index to Color
    pub fn from_index(idx: u8) -> Option<Color> {
        match idx {
            0 => Some(Color::Blue),
            1 => Some(Color::Yellow),
            2 => Some(Color::Red),
            3 => Some(Color::Black),
            4 => Some(Color::White),
            _ => None,
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Color::Blue => "Blue",
            Color::Yellow => "Yellow",
            Color::Red => "Red",
            Color::Black => "Black",
            Color::White => "White",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub const ALL_COLORS: [Color; TILE_COLORS] = [
    Color::Blue,
    Color::Yellow,
    Color::Red,
    Color::Black,
    Color::White,
];

// =============================================================================
// Wall layout constants
// =============================================================================

/// Wall pattern: WALL_PATTERN[row][col] = Color at that position.
/// Each row is the previous one rotated right by one cell.
pub const WALL_PATTERN: [[Color; BOARD_SIZE]; BOARD_SIZE] = [
    // row 0
    [
        Color::Blue,
        Color::Yellow,
        Color::Red,
        Color::Black,
        Color::White,
    ],
    // row 1
    [
        Color::White,
        Color::Blue,
        Color::Yellow,
        Color::Red,
        Color::Black,
    ],
    // row 2
    [
        Color::Black,
        Color::White,
        Color::Blue,
        Color::Yellow,
        Color::Red,
    ],
    // row 3
    [
        Color::Red,
        Color::Black,
        Color::White,
        Color::Blue,
        Color::Yellow,
    ],
    // row 4
    [
        Color::Yellow,
        Color::Red,
        Color::Black,
        Color::White,
        Color::Blue,
    ],
];

/// Destination column lookup: WALL_DEST_COL[row][color_index] => col
pub const WALL_DEST_COL: [[Col; TILE_COLORS]; BOARD_SIZE] = [
    // row 0: Blue=0, Yellow=1, Red=2, Black=3, White=4
    [0, 1, 2, 3, 4],
    // row 1: White=0, Blue=1, Yellow=2, Red=3, Black=4
    [1, 2, 3, 4, 0],
    // row 2: Black=0, White=1, Blue=2, Yellow=3, Red=4
    [2, 3, 4, 0, 1],
    // row 3: Red=0, Black=1, White=2, Blue=3, Yellow=4
    [3, 4, 0, 1, 2],
    // row 4: Yellow=0, Red=1, Black=2, White=3, Blue=4
    [4, 0, 1, 2, 3],
];

/// Column of the wall cell reserved for `color` in `row`.
#[inline]
pub fn wall_column(row: usize, color: Color) -> usize {
    WALL_DEST_COL[row][color.index()] as usize
}
