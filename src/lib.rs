//! Strictly Connect library - real-time Connect Four sessions
//!
//! Players connect over a WebSocket. The first frame of a connection decides
//! its role: create a session, join one with an invite token, or watch one
//! with a spectator token. Moves are validated by the engine in
//! [`strictly_connect4`] and broadcast to everyone in the session.
//!
//! # Architecture
//!
//! - **Registry**: token to session table, owns session lifetime
//! - **Session**: one game and the connections subscribed to it
//! - **Broadcast**: fan-out and history replay
//! - **Connection**: per-connection protocol state machine
//! - **Server**: axum routes and WebSocket framing
//!
//! # Example
//!
//! ```no_run
//! use strictly_connect::{ServerConfig, serve};
//!
//! # async fn example() -> anyhow::Result<()> {
//! serve(ServerConfig::new("127.0.0.1", 5000)).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod broadcast;
mod chat;
mod cli;
mod config;
mod connection;
mod protocol;
mod registry;
mod server;
mod session;

// Crate-level exports - Wire protocol
pub use protocol::{ClientRequest, Opening, ProtocolError, ServerEvent};

// Crate-level exports - Sessions
pub use broadcast::{
    ConnectionId, DeliveryError, EventSender, Participant, Role, Subscribers, replay,
};
pub use registry::{Registry, RegistryError};
pub use session::Session;

// Crate-level exports - Connection handling
pub use chat::{ChatMessage, ChatRoom, relay};
pub use connection::handle_connection;

// Crate-level exports - Server and configuration
pub use cli::{Cli, Command};
pub use config::{ConfigError, ServerConfig};
pub use server::{AppState, router, serve};

// Crate-level exports - Game types
pub use strictly_connect4::{Game, Move, Outcome, PlayError, Player};
