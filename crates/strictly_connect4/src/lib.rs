//! Pure Connect Four game logic.
//!
//! A 7x6 board with gravity: discs always land in the lowest empty row of
//! their column. [`Game::play`] is the single entry point that validates a
//! move, applies it and detects a win or draw. Nothing here performs I/O.
//!
//! ```
//! use strictly_connect4::{Game, Player};
//!
//! let mut game = Game::new();
//! assert_eq!(game.play(Player::First, 3), Ok(0));
//! assert_eq!(game.play(Player::Second, 3), Ok(1));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod game;
pub mod rules;
mod types;

pub use error::PlayError;
pub use game::Game;
pub use types::{Board, COLUMNS, Cell, Move, Outcome, Player, ROWS};
