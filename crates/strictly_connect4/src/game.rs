//! Game state machine for Connect Four.

use crate::error::PlayError;
use crate::rules::{connects_four, is_draw};
use crate::types::{Board, COLUMNS, Move, Outcome, Player, ROWS};
use tracing::{debug, instrument};

/// Connect Four game engine.
///
/// The move history is append-only and the winner, once set, never changes.
/// After the outcome leaves [`Outcome::Ongoing`] every further move is
/// rejected with [`PlayError::GameOver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    board: Board,
    moves: Vec<Move>,
    next_player: Player,
    winner: Option<Player>,
    outcome: Outcome,
}

impl Game {
    /// Creates a new game with [`Player::First`] to move.
    #[instrument]
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            moves: Vec::new(),
            next_player: Player::First,
            winner: None,
            outcome: Outcome::Ongoing,
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the moves played so far, in play order.
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// Returns the player due to move.
    pub fn next_player(&self) -> Player {
        self.next_player
    }

    /// Returns the winner, if any.
    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    /// Returns the game outcome.
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Drops a disc for `player` into `column` and returns the row it landed in.
    ///
    /// Checks run in a fixed order and the first failure wins: game over,
    /// turn, column range, column capacity. A rejected move leaves the game
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns the [`PlayError`] for the first failing check.
    #[instrument(skip(self), fields(next = %self.next_player, played = self.moves.len()))]
    pub fn play(&mut self, player: Player, column: i64) -> Result<usize, PlayError> {
        if self.outcome != Outcome::Ongoing {
            return Err(PlayError::GameOver);
        }

        if player != self.next_player {
            return Err(PlayError::NotYourTurn);
        }

        let column = usize::try_from(column)
            .ok()
            .filter(|&c| c < COLUMNS)
            .ok_or(PlayError::InvalidColumn(column))?;

        if self.board.height(column) >= ROWS {
            return Err(PlayError::ColumnFull(column));
        }

        let row = self.board.drop_disc(column, player);
        self.moves.push(Move {
            player,
            column,
            row,
        });
        self.next_player = player.opponent();
        self.update_outcome(player, column, row);

        debug!(%player, column, row, outcome = ?self.outcome, "Move applied");
        Ok(row)
    }

    /// Evaluates termination for the disc just placed.
    fn update_outcome(&mut self, player: Player, column: usize, row: usize) {
        if connects_four(&self.board, column, row) {
            self.winner = Some(player);
            self.outcome = Outcome::Won;
        } else if is_draw(&self.board, column, row) {
            self.outcome = Outcome::Draw;
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_player_opens() {
        let game = Game::new();
        assert_eq!(game.next_player(), Player::First);
        assert_eq!(game.outcome(), Outcome::Ongoing);
        assert!(game.moves().is_empty());
    }

    #[test]
    fn test_game_over_checked_before_turn() {
        let mut game = Game::new();
        for column in [0, 6, 1, 6, 2, 6, 3] {
            let player = game.next_player();
            game.play(player, column).unwrap();
        }
        assert_eq!(game.outcome(), Outcome::Won);
        // First is not due to move, but game over takes precedence.
        assert_eq!(game.play(Player::First, 0), Err(PlayError::GameOver));
        assert_eq!(game.play(Player::Second, 99), Err(PlayError::GameOver));
    }

    #[test]
    fn test_turn_checked_before_column() {
        let mut game = Game::new();
        assert_eq!(game.play(Player::Second, -1), Err(PlayError::NotYourTurn));
    }

    #[test]
    fn test_negative_column_rejected() {
        let mut game = Game::new();
        assert_eq!(
            game.play(Player::First, -1),
            Err(PlayError::InvalidColumn(-1))
        );
        assert_eq!(
            game.play(Player::First, 7),
            Err(PlayError::InvalidColumn(7))
        );
    }
}
