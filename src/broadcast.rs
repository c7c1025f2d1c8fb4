//! Fan-out of session events to connected participants.

use crate::protocol::ServerEvent;
use derive_getters::Getters;
use derive_more::{Display, Error};
use std::collections::BTreeMap;
use strictly_connect4::{Move, Player};
use tokio::sync::mpsc;
use tracing::{debug, instrument};

/// Process-unique identifier of a connection.
pub type ConnectionId = u64;

/// Outbound half of a connection: events pushed here are written to the socket.
pub type EventSender = mpsc::UnboundedSender<ServerEvent>;

/// What a connection is allowed to do in its session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Role {
    /// Opened the session and plays first.
    #[display("creator")]
    Creator,
    /// Entered with the join token and plays second.
    #[display("joiner")]
    Joiner,
    /// Entered with the watch token; receives events only.
    #[display("watcher")]
    Watcher,
}

impl Role {
    /// The seat this role plays, if any.
    pub fn player(self) -> Option<Player> {
        match self {
            Role::Creator => Some(Player::First),
            Role::Joiner => Some(Player::Second),
            Role::Watcher => None,
        }
    }
}

/// The remote end of a connection has gone away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("Connection {} is closed", id)]
pub struct DeliveryError {
    /// Connection that could not be reached.
    pub id: ConnectionId,
}

/// Handle to one live connection.
#[derive(Debug, Clone, Getters)]
pub struct Participant {
    /// Connection id.
    id: ConnectionId,
    /// Role in the session.
    role: Role,
    #[getter(skip)]
    outbound: EventSender,
}

impl Participant {
    /// Creates a handle around a connection's outbound channel.
    pub fn new(id: ConnectionId, role: Role, outbound: EventSender) -> Self {
        Self { id, role, outbound }
    }

    /// Queues an event for this connection.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError`] once the connection's writer has stopped.
    pub fn send(&self, event: ServerEvent) -> Result<(), DeliveryError> {
        self.outbound
            .send(event)
            .map_err(|_| DeliveryError { id: self.id })
    }
}

/// The set of connections subscribed to a session, iterated in join order.
#[derive(Debug, Default)]
pub struct Subscribers {
    members: BTreeMap<ConnectionId, Participant>,
}

impl Subscribers {
    /// Adds a participant.
    pub fn insert(&mut self, participant: Participant) {
        self.members.insert(participant.id, participant);
    }

    /// Removes a participant if still present. Returns whether it was.
    pub fn remove(&mut self, id: ConnectionId) -> bool {
        self.members.remove(&id).is_some()
    }

    /// Checks membership.
    pub fn contains(&self, id: ConnectionId) -> bool {
        self.members.contains_key(&id)
    }

    /// Number of connected participants.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether nobody is connected.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Delivers `event` to every member, dropping members whose delivery fails.
    ///
    /// Never stops early: a dead recipient does not affect the others.
    #[instrument(skip(self, event), fields(recipients = self.members.len()))]
    pub fn broadcast(&mut self, event: &ServerEvent) {
        self.members.retain(|&id, participant| {
            let delivered = participant.send(event.clone()).is_ok();
            if !delivered {
                debug!(connection = id, "Pruning unreachable participant");
            }
            delivered
        });
    }
}

/// Sends each recorded move to `participant` as its own `play` event.
///
/// `history` is a snapshot taken by the caller; moves accepted after it was
/// taken reach the participant through regular broadcasts instead.
///
/// # Errors
///
/// Stops at the first failed delivery and returns it.
#[instrument(
    skip(participant, history),
    fields(connection = participant.id, moves = history.len())
)]
pub fn replay(participant: &Participant, history: &[Move]) -> Result<(), DeliveryError> {
    for mv in history {
        participant.send(ServerEvent::Play {
            player: mv.player,
            column: mv.column,
            row: mv.row,
        })?;
    }
    Ok(())
}
