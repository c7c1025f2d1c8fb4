//! Tests for the Connect Four engine.

use strictly_connect4::{COLUMNS, Cell, Game, Outcome, PlayError, Player, ROWS};

/// Plays `columns` in order, alternating players from whoever is due.
fn play_all(game: &mut Game, columns: &[i64]) {
    for &column in columns {
        let player = game.next_player();
        game.play(player, column).expect("Valid move");
    }
}

/// A full-board sequence with no line of four anywhere.
const DRAW_SEQUENCE: [i64; 42] = [
    0, 1, 0, 1, 0, 0, 2, 0, 2, 0, 2, 1, 1, 2, 1, 2, 1, 2, 4, 3, 4, 3, 4, 3, 3, 4, 3, 4, 3, 4, 6, 5,
    6, 5, 6, 5, 5, 6, 5, 6, 5, 6,
];

#[test]
fn test_stacking_in_one_column() {
    let mut game = Game::new();
    assert_eq!(game.play(Player::First, 3), Ok(0));
    assert_eq!(game.play(Player::Second, 3), Ok(1));
    assert_eq!(game.play(Player::First, 3), Ok(2));

    let last = game.moves().last().copied().expect("Move recorded");
    assert_eq!(last.player, Player::First);
    assert_eq!((last.column, last.row), (3, 2));
}

#[test]
fn test_row_equals_prior_plays_in_column() {
    let mut game = Game::new();
    let columns = [0, 1, 1, 2, 2, 5, 2, 0, 6, 6, 4, 0];
    let mut counts = [0usize; COLUMNS];
    for column in columns {
        let player = game.next_player();
        let row = game.play(player, column).expect("Valid move");
        let idx = column as usize;
        assert_eq!(row, counts[idx]);
        counts[idx] += 1;
    }
}

#[test]
fn test_seventh_disc_column_full() {
    let mut game = Game::new();
    play_all(&mut game, &[2, 2, 2, 2, 2, 2]);
    assert_eq!(game.board().height(2), ROWS);

    let before = game.clone();
    let player = game.next_player();
    assert_eq!(game.play(player, 2), Err(PlayError::ColumnFull(2)));
    assert_eq!(game, before);
}

#[test]
fn test_out_of_turn_leaves_game_untouched() {
    let mut game = Game::new();
    play_all(&mut game, &[4]);
    let before = game.clone();

    assert_eq!(game.play(Player::First, 4), Err(PlayError::NotYourTurn));
    assert_eq!(game, before);
    assert_eq!(game.next_player(), Player::Second);
    assert_eq!(game.moves().len(), 1);
}

#[test]
fn test_invalid_column_leaves_game_untouched() {
    let mut game = Game::new();
    let before = game.clone();
    assert_eq!(
        game.play(Player::First, 7),
        Err(PlayError::InvalidColumn(7))
    );
    assert_eq!(game, before);
}

#[test]
fn test_horizontal_win_then_game_over() {
    let mut game = Game::new();
    play_all(&mut game, &[0, 6, 1, 6, 2, 6]);
    assert_eq!(game.outcome(), Outcome::Ongoing);

    assert_eq!(game.play(Player::First, 3), Ok(0));
    assert_eq!(game.outcome(), Outcome::Won);
    assert_eq!(game.winner(), Some(Player::First));

    assert_eq!(game.play(Player::Second, 6), Err(PlayError::GameOver));
    assert_eq!(game.winner(), Some(Player::First));
    assert_eq!(game.moves().len(), 7);
}

#[test]
fn test_vertical_win_for_second() {
    let mut game = Game::new();
    play_all(&mut game, &[0, 5, 1, 5, 0, 5, 1]);
    assert_eq!(game.play(Player::Second, 5), Ok(3));
    assert_eq!(game.winner(), Some(Player::Second));
}

#[test]
fn test_full_board_is_draw() {
    let mut game = Game::new();
    play_all(&mut game, &DRAW_SEQUENCE);

    assert!(game.board().is_full());
    assert_eq!(game.outcome(), Outcome::Draw);
    assert_eq!(game.winner(), None);
    assert_eq!(game.play(game.next_player(), 0), Err(PlayError::GameOver));
}

#[test]
fn test_board_reflects_moves() {
    let mut game = Game::new();
    play_all(&mut game, &[3, 3]);
    assert_eq!(game.board().get(3, 0), Some(Cell::Occupied(Player::First)));
    assert_eq!(game.board().get(3, 1), Some(Cell::Occupied(Player::Second)));
    assert_eq!(game.board().get(3, 2), Some(Cell::Empty));
}

#[test]
fn test_error_messages() {
    assert_eq!(PlayError::GameOver.to_string(), "Game is over.");
    assert_eq!(PlayError::NotYourTurn.to_string(), "It isn't your turn.");
    assert_eq!(
        PlayError::InvalidColumn(9).to_string(),
        "Column 9 is out of range (0-6)."
    );
    assert_eq!(PlayError::ColumnFull(1).to_string(), "Column 1 is full.");
}
