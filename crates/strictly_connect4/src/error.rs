//! Errors raised by the game engine.

/// Reason a move was rejected.
///
/// Every variant is recoverable: the game is left exactly as it was before
/// the attempted move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum PlayError {
    /// The game already has a winner or ended in a draw.
    #[display("Game is over.")]
    GameOver,

    /// The other player is due to move.
    #[display("It isn't your turn.")]
    NotYourTurn,

    /// Column index outside the board.
    #[display("Column {} is out of range (0-6).", _0)]
    InvalidColumn(i64),

    /// Column already holds six discs.
    #[display("Column {} is full.", _0)]
    ColumnFull(usize),
}

impl std::error::Error for PlayError {}
