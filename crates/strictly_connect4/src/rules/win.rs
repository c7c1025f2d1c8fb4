//! Win detection for Connect Four.

use crate::types::{Board, COLUMNS, Cell, Player, ROWS};
use tracing::instrument;

/// Horizontal, vertical and both diagonal directions.
const DIRECTIONS: [(isize, isize); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

/// Checks whether the disc at `(column, row)` completes a line of four.
///
/// Only lines passing through that cell are examined, so this must be called
/// right after the disc is placed.
#[instrument(skip(board))]
pub fn connects_four(board: &Board, column: usize, row: usize) -> bool {
    let Some(Cell::Occupied(player)) = board.get(column, row) else {
        return false;
    };

    DIRECTIONS.iter().any(|&(dc, dr)| {
        let run = 1
            + run_length(board, player, column, row, dc, dr)
            + run_length(board, player, column, row, -dc, -dr);
        run >= 4
    })
}

/// Counts consecutive discs of `player` from `(column, row)` stepping by
/// `(dc, dr)`, excluding the starting cell.
fn run_length(
    board: &Board,
    player: Player,
    column: usize,
    row: usize,
    dc: isize,
    dr: isize,
) -> usize {
    let mut count = 0;
    let mut c = column as isize + dc;
    let mut r = row as isize + dr;
    while (0..COLUMNS as isize).contains(&c) && (0..ROWS as isize).contains(&r) {
        if board.get(c as usize, r as usize) != Some(Cell::Occupied(player)) {
            break;
        }
        count += 1;
        c += dc;
        r += dr;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(discs: &[(usize, Player)]) -> Board {
        let mut board = Board::new();
        for &(column, player) in discs {
            board.drop_disc(column, player);
        }
        board
    }

    #[test]
    fn test_empty_cell_never_wins() {
        let board = Board::new();
        assert!(!connects_four(&board, 3, 0));
    }

    #[test]
    fn test_horizontal() {
        let board = board_with(&[
            (0, Player::First),
            (1, Player::First),
            (2, Player::First),
            (3, Player::First),
        ]);
        assert!(connects_four(&board, 3, 0));
        // Anchoring in the middle of the line counts both sides.
        assert!(connects_four(&board, 1, 0));
    }

    #[test]
    fn test_vertical() {
        let board = board_with(&[
            (5, Player::Second),
            (5, Player::Second),
            (5, Player::Second),
            (5, Player::Second),
        ]);
        assert!(connects_four(&board, 5, 3));
    }

    #[test]
    fn test_rising_diagonal() {
        let board = board_with(&[
            (0, Player::First),
            (1, Player::Second),
            (1, Player::First),
            (2, Player::Second),
            (2, Player::Second),
            (2, Player::First),
            (3, Player::Second),
            (3, Player::Second),
            (3, Player::Second),
            (3, Player::First),
        ]);
        assert!(connects_four(&board, 3, 3));
    }

    #[test]
    fn test_falling_diagonal() {
        let board = board_with(&[
            (6, Player::First),
            (5, Player::Second),
            (5, Player::First),
            (4, Player::Second),
            (4, Player::Second),
            (4, Player::First),
            (3, Player::Second),
            (3, Player::Second),
            (3, Player::Second),
            (3, Player::First),
        ]);
        assert!(connects_four(&board, 3, 3));
    }

    #[test]
    fn test_three_is_not_enough() {
        let board = board_with(&[
            (0, Player::First),
            (1, Player::First),
            (2, Player::First),
            (3, Player::Second),
        ]);
        assert!(!connects_four(&board, 2, 0));
        assert!(!connects_four(&board, 3, 0));
    }
}
