//! Game rules for Connect Four.
//!
//! Pure functions over a [`Board`](crate::Board), kept apart from the
//! game's turn bookkeeping.

pub mod draw;
pub mod win;

pub use draw::is_draw;
pub use win::connects_four;
