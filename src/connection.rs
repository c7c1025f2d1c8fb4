//! Per-connection protocol driver.
//!
//! The first frame decides what a connection is: a creator opening a new
//! session, a joiner taking the second seat, or a watcher. Creators and
//! joiners then loop over gameplay frames until the peer disconnects.
//! Watchers only receive.
//!
//! The handler is transport-agnostic: it reads text frames from any
//! [`Stream`] and writes [`ServerEvent`]s to an unbounded channel.

use crate::broadcast::{EventSender, Participant, Role};
use crate::protocol::{ClientRequest, Opening, ServerEvent};
use crate::registry::{Registry, RegistryError};
use crate::session::Session;
use futures::{Stream, StreamExt};
use std::sync::Arc;
use strictly_connect4::Player;
use tracing::{debug, info, instrument, warn};

/// Drives one connection from its first frame to disconnect.
///
/// Ends when `inbound` is exhausted, after running the cleanup for the
/// connection's role: a creator's exit removes the session's tokens from the
/// registry, any exit removes the connection from its session.
#[instrument(skip_all, fields(connection = tracing::field::Empty))]
pub async fn handle_connection<S>(registry: Registry, mut inbound: S, outbound: EventSender)
where
    S: Stream<Item = String> + Unpin,
{
    let id = registry.next_connection_id();
    tracing::Span::current().record("connection", id);

    let Some(first) = inbound.next().await else {
        debug!("Closed before first message");
        return;
    };

    let opening = match Opening::classify(&first) {
        Ok(opening) => opening,
        Err(e) => {
            warn!(error = %e, "Unreadable first message");
            let _ = outbound.send(ServerEvent::error(e));
            return;
        }
    };

    match opening {
        Opening::Create => {
            let participant = Participant::new(id, Role::Creator, outbound);
            let session = registry.create(participant.clone());
            let init = ServerEvent::Init {
                join: session.join_token().clone(),
                watch: session.watch_token().clone(),
            };
            if participant.send(init).is_err() {
                debug!("Creator gone before init");
            }

            info!("Creator seated as first player");
            play_loop(&session, &participant, &mut inbound).await;

            registry.destroy(&session);
            session.detach(id);
        }
        Opening::Join(token) => {
            let Some(session) = resolve(token, |t| registry.resolve_join(t), &outbound) else {
                return;
            };
            let participant = Participant::new(id, Role::Joiner, outbound);
            session.attach(participant.clone());

            info!("Joiner seated as second player");
            play_loop(&session, &participant, &mut inbound).await;

            session.detach(id);
        }
        Opening::Watch(token) => {
            let Some(session) = resolve(token, |t| registry.resolve_watch(t), &outbound) else {
                return;
            };
            session.attach(Participant::new(id, Role::Watcher, outbound));

            info!("Watcher attached");
            // Watchers don't play; their frames are read only to notice disconnect.
            while inbound.next().await.is_some() {}

            session.detach(id);
        }
    }

    debug!("Connection closed");
}

/// Looks up a token, reporting failure to the connection.
fn resolve<F>(token: Option<String>, lookup: F, outbound: &EventSender) -> Option<Arc<Session>>
where
    F: FnOnce(&str) -> Result<Arc<Session>, RegistryError>,
{
    let result = match token {
        Some(token) => lookup(&token),
        None => Err(RegistryError::TokenNotFound),
    };
    match result {
        Ok(session) => Some(session),
        Err(e) => {
            let _ = outbound.send(ServerEvent::error(e));
            None
        }
    }
}

/// Reads gameplay frames until disconnect or a frame that can't be parsed.
async fn play_loop<S>(session: &Session, participant: &Participant, inbound: &mut S)
where
    S: Stream<Item = String> + Unpin,
{
    let Some(player) = participant.role().player() else {
        return;
    };

    while let Some(text) = inbound.next().await {
        let request = match ClientRequest::parse(&text) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "Protocol fault, closing");
                let _ = participant.send(ServerEvent::error(e));
                break;
            }
        };

        match request {
            ClientRequest::Play { column } => play_move(session, participant, player, column),
        }
    }
}

/// Plays one move, telling only this connection about a rejection.
fn play_move(session: &Session, participant: &Participant, player: Player, column: i64) {
    if let Err(e) = session.play(player, column) {
        let _ = participant.send(ServerEvent::error(e));
    }
}
