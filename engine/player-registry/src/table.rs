//! Fixed-width table rendering for the scoreboard
//!
//! Every row is exactly `width` characters:
//!
//! ```text
//!  ------------------------------
//! | RANK   | PLAYER NAME | SCORE |
//!  ------------------------------
//! | 1.     | Alice       |    10 |
//!  ------------------------------
//! ```

use crate::types::{truncate_chars, Player};

/// Narrowest table that still fits the column headers
pub const MIN_TABLE_WIDTH: usize = 32;

/// Lines taken by the header block (border, header row, border)
pub const HEADER_LINES: usize = 3;

/// Lines taken by each player (row and its border)
pub const LINES_PER_PLAYER: usize = 2;

const RANK_CELL: usize = 7;
const SCORE_CELL: usize = 5;

/// Borders, padding, rank and score columns
const FIXED_COLUMNS: usize = 21;

/// Render players, in the order given, as a table `width` columns wide
///
/// Widths below [`MIN_TABLE_WIDTH`] are widened to it. Names that do not fit
/// the name column are truncated.
pub fn render<'a>(players: impl IntoIterator<Item = &'a Player>, width: usize) -> String {
    let width = width.max(MIN_TABLE_WIDTH);
    let name_cell = width - FIXED_COLUMNS;
    let border = format!(" {}\n", "-".repeat(width - 2));

    let mut out = String::new();
    out.push_str(&border);
    out.push_str(&row("RANK", "PLAYER NAME", "SCORE", name_cell));
    out.push_str(&border);

    for (index, player) in players.into_iter().enumerate() {
        let rank = format!("{}.", index + 1);
        let name = truncate_chars(&player.name, name_cell);
        out.push_str(&row(&rank, name, &player.score.to_string(), name_cell));
        out.push_str(&border);
    }

    out
}

/// How many players fit on a terminal `height` lines tall
///
/// One line is left for the prompt.
pub fn players_for_height(height: usize) -> usize {
    height.saturating_sub(HEADER_LINES + 1) / LINES_PER_PLAYER
}

fn row(rank: &str, name: &str, score: &str, name_cell: usize) -> String {
    format!("| {rank:<RANK_CELL$}| {name:<name_cell$} | {score:>SCORE_CELL$} |\n")
}
