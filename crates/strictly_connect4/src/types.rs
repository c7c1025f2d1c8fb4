//! Core domain types for Connect Four.

use serde::{Deserialize, Serialize};

/// Number of columns on the board.
pub const COLUMNS: usize = 7;

/// Number of rows on the board.
pub const ROWS: usize = 6;

/// Player in the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(strum::Display, strum::EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Player {
    /// Player who opened the session (moves first).
    First,
    /// Player who joined with the invite token.
    Second,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::First => Player::Second,
            Player::Second => Player::First,
        }
    }
}

/// A cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Empty cell.
    Empty,
    /// Cell occupied by a player's disc.
    Occupied(Player),
}

/// 7x6 Connect Four board.
///
/// Cells are stored column-major with row 0 at the bottom, so a column
/// fills from index 0 upwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: [[Cell; ROWS]; COLUMNS],
    heights: [usize; COLUMNS],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            cells: [[Cell::Empty; ROWS]; COLUMNS],
            heights: [0; COLUMNS],
        }
    }

    /// Gets the cell at the given column and row, if in bounds.
    pub fn get(&self, column: usize, row: usize) -> Option<Cell> {
        self.cells.get(column)?.get(row).copied()
    }

    /// Number of discs already dropped in `column` (0 when out of bounds).
    pub fn height(&self, column: usize) -> usize {
        self.heights.get(column).copied().unwrap_or(0)
    }

    /// Drops a disc into a column and returns the row it landed in.
    ///
    /// Callers validate bounds and capacity first.
    pub(crate) fn drop_disc(&mut self, column: usize, player: Player) -> usize {
        let row = self.heights[column];
        self.cells[column][row] = Cell::Occupied(player);
        self.heights[column] += 1;
        row
    }

    /// Checks if every cell is occupied.
    pub fn is_full(&self) -> bool {
        self.heights.iter().all(|&h| h == ROWS)
    }

    /// Formats the board as text, top row first.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity((COLUMNS + 1) * ROWS);
        for row in (0..ROWS).rev() {
            for column in 0..COLUMNS {
                out.push(match self.cells[column][row] {
                    Cell::Empty => '.',
                    Cell::Occupied(Player::First) => 'R',
                    Cell::Occupied(Player::Second) => 'Y',
                });
            }
            if row > 0 {
                out.push('\n');
            }
        }
        out
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// A recorded move. Immutable once appended to a game's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// The player who made the move.
    pub player: Player,
    /// Column the disc was dropped into.
    pub column: usize,
    /// Row the disc landed in (0 = bottom).
    pub row: usize,
}

/// Terminal classification of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Moves are still accepted.
    Ongoing,
    /// A player connected four.
    Won,
    /// The board filled up without a winner.
    Draw,
}
