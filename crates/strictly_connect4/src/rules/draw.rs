//! Draw detection for Connect Four.

use super::win::connects_four;
use crate::types::Board;
use tracing::instrument;

/// A full board where the last disc did not complete a line is a draw.
#[instrument(skip(board))]
pub fn is_draw(board: &Board, column: usize, row: usize) -> bool {
    board.is_full() && !connects_four(board, column, row)
}
