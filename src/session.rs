//! A single game instance and the connections watching it.

use crate::broadcast::{self, ConnectionId, Participant, Subscribers};
use crate::protocol::ServerEvent;
use derive_getters::Getters;
use parking_lot::Mutex;
use strictly_connect4::{Game, Move, Outcome, PlayError, Player};
use tracing::{debug, info, instrument, warn};

/// Mutable state guarded by the session lock.
///
/// The lock is never held across an `.await`, so each engine step together
/// with its broadcasts is atomic with respect to other connections.
#[derive(Debug, Default)]
struct SessionState {
    game: Game,
    connected: Subscribers,
}

/// One game plus its token pair and subscribed connections.
#[derive(Debug, Getters)]
pub struct Session {
    /// Token granting the second seat.
    join_token: String,
    /// Token granting spectator access.
    watch_token: String,
    #[getter(skip)]
    state: Mutex<SessionState>,
}

impl Session {
    /// Creates a session with a fresh game and `creator` already subscribed.
    #[instrument(skip_all, fields(join = %short(&join_token)))]
    pub(crate) fn new(join_token: String, watch_token: String, creator: Participant) -> Self {
        let mut state = SessionState::default();
        state.connected.insert(creator);
        info!("Creating new game session");
        Self {
            join_token,
            watch_token,
            state: Mutex::new(state),
        }
    }

    /// Subscribes a late joiner and replays the moves played so far.
    ///
    /// The history is snapshotted under the lock at the moment of
    /// subscription; moves accepted after that point arrive through live
    /// broadcasts, possibly interleaved with the replay.
    #[instrument(
        skip(self, participant),
        fields(
            join = %short(&self.join_token),
            connection = *participant.id(),
            role = %participant.role()
        )
    )]
    pub fn attach(&self, participant: Participant) {
        let history: Vec<Move> = {
            let mut state = self.state.lock();
            state.connected.insert(participant.clone());
            state.game.moves().to_vec()
        };

        info!(
            moves = history.len(),
            "Participant attached, replaying history"
        );
        if let Err(e) = broadcast::replay(&participant, &history) {
            debug!(error = %e, "Replay interrupted");
        }
    }

    /// Unsubscribes a connection. Safe to call if it is already gone.
    #[instrument(skip(self), fields(join = %short(&self.join_token)))]
    pub fn detach(&self, id: ConnectionId) {
        let removed = self.state.lock().connected.remove(id);
        debug!(removed, "Participant detached");
    }

    /// Plays a move and broadcasts the result to every participant.
    ///
    /// On success a `play` event goes out, followed by a `win` event if the
    /// move won the game. Returns the row the disc landed in.
    ///
    /// # Errors
    ///
    /// Returns the engine's [`PlayError`]; nothing is broadcast in that case.
    #[instrument(skip(self), fields(join = %short(&self.join_token)))]
    pub fn play(&self, player: Player, column: i64) -> Result<usize, PlayError> {
        let mut state = self.state.lock();
        let row = state.game.play(player, column).map_err(|e| {
            warn!(error = %e, "Move rejected");
            e
        })?;

        // Report the move as the engine recorded it.
        if let Some(&Move { player, column, row }) = state.game.moves().last() {
            state.connected.broadcast(&ServerEvent::Play {
                player,
                column,
                row,
            });
        }

        if state.game.outcome() == Outcome::Won {
            if let Some(winner) = state.game.winner() {
                info!(%winner, "Game won");
                state
                    .connected
                    .broadcast(&ServerEvent::Win { player: winner });
            }
        } else if state.game.outcome() == Outcome::Draw {
            info!("Game drawn");
        }

        debug!(board = %state.game.board().render(), "Board after move");
        Ok(row)
    }

    /// Number of currently connected participants.
    pub fn connected_count(&self) -> usize {
        self.state.lock().connected.len()
    }

    /// Whether a connection is currently subscribed.
    pub fn is_connected(&self, id: ConnectionId) -> bool {
        self.state.lock().connected.contains(id)
    }

    /// Snapshot of the move history.
    pub fn moves(&self) -> Vec<Move> {
        self.state.lock().game.moves().to_vec()
    }

    /// Current game outcome.
    pub fn outcome(&self) -> Outcome {
        self.state.lock().game.outcome()
    }
}

/// Token prefix safe to put in logs.
pub(crate) fn short(token: &str) -> &str {
    token.get(..6).unwrap_or(token)
}
