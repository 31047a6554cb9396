//! Player board: pattern lines, wall, floor line and the scoring rules that
//! move tiles between them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    wall_column, Color, Row, ALL_COLORS, BOARD_SIZE, COLOR_BONUS, COLUMN_BONUS,
    FIRST_PLAYER_PENALTY, FLOOR_PENALTY, ROW_BONUS, WALL_PATTERN,
};

/// Destination for drafted tiles
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum DraftDestination {
    PatternLine(Row), // 0..4
    Floor,
}

impl fmt::Display for DraftDestination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DraftDestination::PatternLine(r) => write!(f, "pattern line {}", *r as usize + 1),
            DraftDestination::Floor => f.write_str("the floor"),
        }
    }
}

/// A single pattern line (one of 5 rows, capacities 1-5)
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PatternLine {
    pub(crate) color: Option<Color>, // None => empty; Some(c) => all tiles are c
    pub(crate) count: u8,            // 0..=capacity(row_index)
}

impl PatternLine {
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    pub fn len(&self) -> usize {
        self.count as usize
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Wall: 5x5 grid, each cell either empty (None) or holding the color the
/// wall pattern reserves for it
pub type Wall = [[Option<Color>; BOARD_SIZE]; BOARD_SIZE];

/// What `score_penalty_row` did to a board.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PenaltyOutcome {
    /// Floor tiles, to be returned to the supply's discard pile
    pub discarded: Vec<Color>,
    /// Whether the board held the first player token this round
    pub held_token: bool,
    /// Points actually removed (less than the nominal total when the score
    /// bottomed out at zero)
    pub points_lost: u16,
}

/// Complete state for one player
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PlayerBoard {
    pub(crate) pattern_lines: [PatternLine; BOARD_SIZE],
    pub(crate) wall: Wall,
    /// Unbounded; only the first `FLOOR_CAPACITY` tiles are penalised
    pub(crate) floor: Vec<Color>,
    pub(crate) score: u16,
    pub(crate) has_first_player_token: bool,
}

impl PlayerBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pattern_lines(&self) -> &[PatternLine; BOARD_SIZE] {
        &self.pattern_lines
    }

    pub fn wall(&self) -> &Wall {
        &self.wall
    }

    pub fn floor(&self) -> &[Color] {
        &self.floor
    }

    pub fn score(&self) -> u16 {
        self.score
    }

    pub fn has_first_player_token(&self) -> bool {
        self.has_first_player_token
    }

    /// Whether tiles of `color` may be sent to `dest`.
    ///
    /// The floor always accepts. A pattern line rejects when it is full, when
    /// it already holds another color, or when its wall row already has
    /// `color`.
    pub fn can_place(&self, dest: DraftDestination, color: Color) -> bool {
        let r = match dest {
            DraftDestination::Floor => return true,
            DraftDestination::PatternLine(row) => row as usize,
        };
        let Some(line) = self.pattern_lines.get(r) else {
            return false;
        };

        if line.count as usize >= r + 1 {
            return false;
        }
        if line.color.is_some_and(|existing| existing != color) {
            return false;
        }
        self.wall[r][wall_column(r, color)].is_none()
    }

    /// Put `tiles` (all one color) at `dest`. Tiles that do not fit in the
    /// pattern line come back to the caller, who sends them to the floor.
    /// If `can_place` rejects the line, every tile comes back and the board
    /// is left unchanged.
    pub fn place(&mut self, dest: DraftDestination, mut tiles: Vec<Color>) -> Vec<Color> {
        let r = match dest {
            DraftDestination::Floor => {
                self.floor.append(&mut tiles);
                return Vec::new();
            }
            DraftDestination::PatternLine(row) => row as usize,
        };
        match tiles.first() {
            Some(&color) if self.can_place(dest, color) => {}
            _ => return tiles,
        }
        let Some(line) = self.pattern_lines.get_mut(r) else {
            return tiles;
        };

        let space = r + 1 - line.count as usize;
        let overflow = if tiles.len() > space {
            tiles.split_off(space)
        } else {
            Vec::new()
        };

        if let Some(&color) = tiles.first() {
            line.color = Some(color);
            line.count += tiles.len() as u8;
        }
        overflow
    }

    /// Append tiles to the floor line.
    pub fn add_to_floor(&mut self, tiles: Vec<Color>) {
        self.floor.extend(tiles);
    }

    pub(crate) fn grant_first_player_token(&mut self) {
        self.has_first_player_token = true;
    }

    /// Move one tile from every full pattern line onto the wall, scoring each
    /// placement, and empty those lines. Returns the leftover tiles of the
    /// emptied lines for the discard pile. Incomplete lines carry over.
    pub fn resolve_wall_transfers(&mut self) -> Vec<Color> {
        let mut discarded = Vec::new();

        for r in 0..BOARD_SIZE {
            let line = self.pattern_lines[r];
            let Some(color) = line.color else { continue };
            if line.count as usize != r + 1 {
                continue;
            }

            let col = wall_column(r, color);
            debug_assert!(self.wall[r][col].is_none(), "wall cell already filled");
            self.wall[r][col] = Some(color);

            let points = score_placement(&self.wall, r, col);
            self.score += points;
            tracing::debug!(row = r, col, ?color, points, "tile placed on wall");

            discarded.extend(std::iter::repeat(color).take(r));
            self.pattern_lines[r] = PatternLine::default();
        }

        discarded
    }

    /// Apply floor penalties and the first player token deduction, one step
    /// at a time with the score floored at zero after each step. Clears the
    /// floor and the token.
    pub fn score_penalty_row(&mut self) -> PenaltyOutcome {
        let before = self.score;

        for (penalty, _) in FLOOR_PENALTY.iter().zip(&self.floor) {
            self.score = self.score.saturating_sub(penalty.unsigned_abs() as u16);
        }

        let held_token = std::mem::take(&mut self.has_first_player_token);
        if held_token {
            self.score = self.score.saturating_sub(FIRST_PLAYER_PENALTY);
        }

        PenaltyOutcome {
            discarded: std::mem::take(&mut self.floor),
            held_token,
            points_lost: before - self.score,
        }
    }

    /// True if any horizontal wall row is complete (the game-end trigger).
    pub fn has_complete_row(&self) -> bool {
        self.complete_rows() > 0
    }

    pub fn complete_rows(&self) -> usize {
        self.wall
            .iter()
            .filter(|row| row.iter().all(Option::is_some))
            .count()
    }

    pub fn complete_columns(&self) -> usize {
        (0..BOARD_SIZE)
            .filter(|&col| (0..BOARD_SIZE).all(|row| self.wall[row][col].is_some()))
            .count()
    }

    /// Colors whose five wall cells are all filled
    pub fn complete_colors(&self) -> usize {
        ALL_COLORS
            .into_iter()
            .filter(|&color| {
                (0..BOARD_SIZE).all(|row| self.wall[row][wall_column(row, color)].is_some())
            })
            .count()
    }

    /// +2 per complete row, +7 per complete column, +10 per complete color.
    pub fn end_game_bonus(&self) -> u16 {
        self.complete_rows() as u16 * ROW_BONUS
            + self.complete_columns() as u16 * COLUMN_BONUS
            + self.complete_colors() as u16 * COLOR_BONUS
    }

    pub(crate) fn apply_end_game_bonus(&mut self) -> u16 {
        let bonus = self.end_game_bonus();
        self.score += bonus;
        bonus
    }

    /// Tiles held by this board: pattern lines, wall and floor
    pub fn tile_count(&self) -> usize {
        let staged: usize = self.pattern_lines.iter().map(PatternLine::len).sum();
        let walled = self.wall.iter().flatten().filter(|c| c.is_some()).count();
        staged + walled + self.floor.len()
    }
}

/// Score a tile placement on the wall
pub fn score_placement(wall: &Wall, row: usize, col: usize) -> u16 {
    debug_assert_eq!(wall[row][col], Some(WALL_PATTERN[row][col]));

    // Horizontal run through (row, col), placed tile included
    let mut h_start = col;
    while h_start > 0 && wall[row][h_start - 1].is_some() {
        h_start -= 1;
    }
    let mut h_end = col;
    while h_end < BOARD_SIZE - 1 && wall[row][h_end + 1].is_some() {
        h_end += 1;
    }
    let horiz = (h_end - h_start + 1) as u16;

    // Vertical run
    let mut v_start = row;
    while v_start > 0 && wall[v_start - 1][col].is_some() {
        v_start -= 1;
    }
    let mut v_end = row;
    while v_end < BOARD_SIZE - 1 && wall[v_end + 1][col].is_some() {
        v_end += 1;
    }
    let vert = (v_end - v_start + 1) as u16;

    if horiz == 1 && vert == 1 {
        // Isolated tile
        1
    } else {
        let h_score = if horiz > 1 { horiz } else { 0 };
        let v_score = if vert > 1 { vert } else { 0 };
        h_score + v_score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn fill(board: &mut PlayerBoard, cells: &[(usize, usize)]) {
        for &(r, c) in cells {
            board.wall[r][c] = Some(WALL_PATTERN[r][c]);
        }
    }

    fn staged(board: &mut PlayerBoard, row: usize, color: Color, count: u8) {
        board.pattern_lines[row] = PatternLine {
            color: Some(color),
            count,
        };
    }

    // =========================================================================
    // Placement legality
    // =========================================================================

    #[test]
    fn test_can_place_on_empty_board() {
        let board = PlayerBoard::new();
        for row in 0..BOARD_SIZE as u8 {
            for color in ALL_COLORS {
                assert!(board.can_place(DraftDestination::PatternLine(row), color));
            }
        }
        assert!(!board.can_place(DraftDestination::PatternLine(5), Color::Blue));
    }

    #[test]
    fn test_can_place_rejects_color_already_on_wall_row() {
        let mut board = PlayerBoard::new();
        // Red sits in column 3 of row 1
        fill(&mut board, &[(1, 3)]);

        assert!(!board.can_place(DraftDestination::PatternLine(1), Color::Red));
        assert!(board.can_place(DraftDestination::PatternLine(1), Color::Blue));
        assert!(board.can_place(DraftDestination::PatternLine(2), Color::Red));
    }

    #[test]
    fn test_wall_constraint_holds_for_every_row_and_color() {
        for row in 0..BOARD_SIZE {
            for color in ALL_COLORS {
                let mut board = PlayerBoard::new();
                fill(&mut board, &[(row, wall_column(row, color))]);
                assert!(!board.can_place(DraftDestination::PatternLine(row as u8), color));
            }
        }
    }

    #[test]
    fn test_can_place_rejects_full_or_mismatched_line() {
        let mut board = PlayerBoard::new();
        staged(&mut board, 0, Color::Blue, 1);
        staged(&mut board, 2, Color::Red, 1);

        assert!(!board.can_place(DraftDestination::PatternLine(0), Color::Blue));
        assert!(!board.can_place(DraftDestination::PatternLine(2), Color::Yellow));
        assert!(board.can_place(DraftDestination::PatternLine(2), Color::Red));
    }

    #[test]
    fn test_floor_always_accepts() {
        let mut board = PlayerBoard::new();
        fill(&mut board, &[(0, 0), (0, 1), (0, 2), (0, 3), (0, 4)]);
        for color in ALL_COLORS {
            assert!(board.can_place(DraftDestination::Floor, color));
        }
    }

    // =========================================================================
    // Placing drafted tiles
    // =========================================================================

    #[test]
    fn test_place_returns_overflow() {
        let mut board = PlayerBoard::new();
        let overflow = board.place(DraftDestination::PatternLine(1), vec![Color::Black; 4]);

        assert_eq!(overflow, vec![Color::Black; 2]);
        assert_eq!(board.pattern_lines()[1].len(), 2);
        assert_eq!(board.pattern_lines()[1].color(), Some(Color::Black));
        assert!(board.floor().is_empty());
    }

    #[test]
    fn test_place_tops_up_partial_line() {
        let mut board = PlayerBoard::new();
        staged(&mut board, 3, Color::White, 2);

        let overflow = board.place(DraftDestination::PatternLine(3), vec![Color::White; 3]);
        assert_eq!(overflow, vec![Color::White]);
        assert_eq!(board.pattern_lines()[3].len(), 4);
    }

    #[test]
    fn test_place_rejected_line_returns_all_tiles() {
        let mut board = PlayerBoard::new();
        staged(&mut board, 2, Color::Red, 1);
        let before = board.clone();

        let overflow = board.place(DraftDestination::PatternLine(2), vec![Color::Yellow; 2]);
        assert_eq!(overflow, vec![Color::Yellow; 2]);
        assert_eq!(board, before);

        // Blue already sits on row 0 of the wall.
        let mut board = PlayerBoard::new();
        board.place(DraftDestination::PatternLine(0), vec![Color::Blue]);
        assert!(board.resolve_wall_transfers().is_empty());
        let before = board.clone();

        let overflow = board.place(DraftDestination::PatternLine(0), vec![Color::Blue]);
        assert_eq!(overflow, vec![Color::Blue]);
        assert_eq!(board, before);
        assert!(board.resolve_wall_transfers().is_empty());
        assert_eq!(board.score(), 1);
        assert_eq!(board.tile_count(), 1);
    }

    #[test]
    fn test_place_on_floor_keeps_everything() {
        let mut board = PlayerBoard::new();
        board.place(DraftDestination::Floor, vec![Color::Red; 5]);
        board.add_to_floor(vec![Color::Blue; 4]);
        assert_eq!(board.floor().len(), 9);
        assert_eq!(board.tile_count(), 9);
    }

    // =========================================================================
    // Placement scoring
    // =========================================================================

    #[test]
    fn test_score_placement_isolated() {
        let mut board = PlayerBoard::new();
        fill(&mut board, &[(2, 2)]);
        assert_eq!(score_placement(&board.wall, 2, 2), 1);
    }

    #[test]
    fn test_score_placement_horizontal_only() {
        let mut board = PlayerBoard::new();
        fill(&mut board, &[(2, 1), (2, 2), (2, 3)]);
        assert_eq!(score_placement(&board.wall, 2, 2), 3);
    }

    #[test]
    fn test_score_placement_vertical_only() {
        let mut board = PlayerBoard::new();
        fill(&mut board, &[(0, 4), (1, 4)]);
        assert_eq!(score_placement(&board.wall, 1, 4), 2);
    }

    #[test]
    fn test_score_placement_sums_both_runs() {
        let mut board = PlayerBoard::new();
        // Horizontal run of 3 and vertical run of 2 through (3, 2)
        fill(&mut board, &[(3, 0), (3, 1), (3, 2), (2, 2)]);
        assert_eq!(score_placement(&board.wall, 3, 2), 5);
    }

    #[test]
    fn test_score_placement_gap_breaks_run() {
        let mut board = PlayerBoard::new();
        fill(&mut board, &[(0, 0), (0, 2), (0, 3)]);
        assert_eq!(score_placement(&board.wall, 0, 0), 1);
        assert_eq!(score_placement(&board.wall, 0, 3), 2);
    }

    #[test]
    fn test_score_placement_full_cross() {
        let mut board = PlayerBoard::new();
        let row: Vec<_> = (0..BOARD_SIZE).map(|c| (2, c)).collect();
        let col: Vec<_> = (0..BOARD_SIZE).map(|r| (r, 2)).collect();
        fill(&mut board, &row);
        fill(&mut board, &col);
        assert_eq!(score_placement(&board.wall, 2, 2), 10);
    }

    // =========================================================================
    // Wall transfers
    // =========================================================================

    #[test]
    fn test_resolve_moves_only_full_lines() {
        let mut board = PlayerBoard::new();
        staged(&mut board, 0, Color::Yellow, 1);
        staged(&mut board, 2, Color::Red, 3);
        staged(&mut board, 4, Color::Blue, 2);

        let discarded = board.resolve_wall_transfers();

        assert_eq!(discarded, vec![Color::Red, Color::Red]);
        assert_eq!(board.wall[0][wall_column(0, Color::Yellow)], Some(Color::Yellow));
        assert_eq!(board.wall[2][wall_column(2, Color::Red)], Some(Color::Red));
        assert!(board.pattern_lines()[0].is_empty());
        assert!(board.pattern_lines()[2].is_empty());
        assert_eq!(board.pattern_lines()[4].len(), 2);
        // Two isolated tiles
        assert_eq!(board.score(), 2);
    }

    #[test]
    fn test_resolve_scores_incrementally_top_to_bottom() {
        let mut board = PlayerBoard::new();
        // All three colors belong to column 0 in their rows.
        staged(&mut board, 0, Color::Blue, 1);
        staged(&mut board, 1, Color::White, 2);
        staged(&mut board, 2, Color::Black, 3);

        board.resolve_wall_transfers();

        // Row 0: isolated (1). Row 1: vertical run of 2 (2). Row 2: run of 3 (3).
        assert_eq!(board.score(), 6);
    }

    // =========================================================================
    // Floor penalties
    // =========================================================================

    #[test]
    fn test_penalty_sequence_applied_positionally() {
        let mut board = PlayerBoard::new();
        board.score = 20;
        board.add_to_floor(vec![Color::Red; 3]);

        let outcome = board.score_penalty_row();
        assert_eq!(board.score(), 16);
        assert_eq!(outcome.points_lost, 4);
        assert_eq!(outcome.discarded, vec![Color::Red; 3]);
        assert!(!outcome.held_token);
        assert!(board.floor().is_empty());
    }

    #[test]
    fn test_penalty_caps_at_seven_tiles() {
        let mut board = PlayerBoard::new();
        board.score = 30;
        board.add_to_floor(vec![Color::Blue; 10]);

        let outcome = board.score_penalty_row();
        assert_eq!(board.score(), 16);
        assert_eq!(outcome.discarded.len(), 10);
    }

    #[test]
    fn test_penalty_floors_at_zero_with_token() {
        let mut board = PlayerBoard::new();
        board.add_to_floor(vec![Color::Black; 7]);
        board.grant_first_player_token();

        let outcome = board.score_penalty_row();
        assert_eq!(board.score(), 0);
        assert_eq!(outcome.points_lost, 0);
        assert!(outcome.held_token);
        assert!(!board.has_first_player_token());
    }

    #[test]
    fn test_penalty_floor_is_per_step() {
        // 3 points against [-1, -1, -2] then the token: 3 -> 2 -> 1 -> 0 -> 0
        let mut board = PlayerBoard::new();
        board.score = 3;
        board.add_to_floor(vec![Color::White; 3]);
        board.grant_first_player_token();

        let outcome = board.score_penalty_row();
        assert_eq!(board.score(), 0);
        assert_eq!(outcome.points_lost, 3);
    }

    #[test]
    fn test_token_alone_costs_one_point() {
        let mut board = PlayerBoard::new();
        board.score = 5;
        board.grant_first_player_token();
        board.score_penalty_row();
        assert_eq!(board.score(), 4);
    }

    // =========================================================================
    // End-game bonus
    // =========================================================================

    #[test]
    fn test_bonus_single_row() {
        let mut board = PlayerBoard::new();
        let row: Vec<_> = (0..BOARD_SIZE).map(|c| (0, c)).collect();
        fill(&mut board, &row);

        assert!(board.has_complete_row());
        assert_eq!(board.end_game_bonus(), 2);
    }

    #[test]
    fn test_bonus_single_column() {
        let mut board = PlayerBoard::new();
        let col: Vec<_> = (0..BOARD_SIZE).map(|r| (r, 0)).collect();
        fill(&mut board, &col);

        assert!(!board.has_complete_row());
        assert_eq!(board.end_game_bonus(), 7);
    }

    #[test]
    fn test_bonus_complete_color() {
        let mut board = PlayerBoard::new();
        let cells: Vec<_> = (0..BOARD_SIZE)
            .map(|r| (r, wall_column(r, Color::Blue)))
            .collect();
        fill(&mut board, &cells);

        assert_eq!(board.complete_colors(), 1);
        assert_eq!(board.end_game_bonus(), 10);
    }

    #[test]
    fn test_bonus_full_wall() {
        let mut board = PlayerBoard::new();
        board.score = 4;
        let all: Vec<_> = (0..BOARD_SIZE)
            .flat_map(|r| (0..BOARD_SIZE).map(move |c| (r, c)))
            .collect();
        fill(&mut board, &all);

        // 5 rows * 2 + 5 columns * 7 + 5 colors * 10
        assert_eq!(board.apply_end_game_bonus(), 95);
        assert_eq!(board.score(), 99);
    }

    proptest! {
        #[test]
        fn prop_penalty_never_goes_below_zero(
            start in 0u16..40,
            floor_len in 0usize..12,
            token in any::<bool>(),
        ) {
            let mut board = PlayerBoard::new();
            board.score = start;
            board.floor = vec![Color::Red; floor_len];
            board.has_first_player_token = token;

            let full_penalty: u16 = FLOOR_PENALTY
                .iter()
                .take(floor_len)
                .map(|p| p.unsigned_abs() as u16)
                .sum::<u16>()
                + if token { FIRST_PLAYER_PENALTY } else { 0 };

            let outcome = board.score_penalty_row();

            prop_assert_eq!(board.score(), start.saturating_sub(full_penalty));
            prop_assert_eq!(outcome.points_lost, start - board.score());
            prop_assert_eq!(outcome.discarded.len(), floor_len);
            prop_assert_eq!(outcome.held_token, token);
            prop_assert!(board.floor().is_empty());
            prop_assert!(!board.has_first_player_token());
        }
    }
}
