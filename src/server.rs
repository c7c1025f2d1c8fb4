//! HTTP and WebSocket transport.
//!
//! Routes:
//! - `GET /` health check
//! - `GET /ws` game sessions
//! - `GET /ws/chat` chat relay

use crate::chat::{self, ChatMessage, ChatRoom};
use crate::config::ServerConfig;
use crate::connection::handle_connection;
use crate::protocol::ServerEvent;
use crate::registry::Registry;
use axum::Router;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::routing::get;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, Stream, StreamExt, future};
use serde::Serialize;
use tokio::sync::mpsc;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, instrument, warn};

/// State shared by all handlers.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Active game sessions.
    pub registry: Registry,
    /// The chat room.
    pub chat: ChatRoom,
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/ws", get(game_socket))
        .route("/ws/chat", get(chat_socket))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds the configured address and serves until the process ends.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
#[instrument(skip(config), fields(addr = %config.bind_addr()))]
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!("Server ready at http://{}/", config.bind_addr());

    axum::serve(listener, router(AppState::default())).await?;
    Ok(())
}

async fn health() -> &'static str {
    "Hello"
}

async fn game_socket(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| async move {
        let (sink, stream) = socket.split();
        let (tx, rx) = mpsc::unbounded_channel::<ServerEvent>();
        let writer = tokio::spawn(write_frames(sink, rx));

        handle_connection(state.registry, std::pin::pin!(text_frames(stream)), tx).await;

        // The handler dropped its sender; queued events still flush.
        if let Err(e) = writer.await {
            warn!(error = %e, "Writer task failed");
        }
    })
}

async fn chat_socket(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| async move {
        let (sink, stream) = socket.split();
        let (tx, rx) = mpsc::unbounded_channel::<ChatMessage>();
        let writer = tokio::spawn(write_frames(sink, rx));

        chat::relay(state.chat, std::pin::pin!(text_frames(stream)), tx).await;

        if let Err(e) = writer.await {
            warn!(error = %e, "Writer task failed");
        }
    })
}

/// Adapts a socket to a stream of text frames.
///
/// Ends at the first close frame or read error. Other frame kinds are skipped.
fn text_frames(stream: SplitStream<WebSocket>) -> impl Stream<Item = String> {
    stream
        .take_while(|frame| {
            let open = match frame {
                Ok(Message::Close(_)) => false,
                Ok(_) => true,
                Err(e) => {
                    debug!(error = %e, "Socket read failed");
                    false
                }
            };
            future::ready(open)
        })
        .filter_map(|frame| {
            future::ready(match frame {
                Ok(Message::Text(text)) => Some(text.as_str().to_owned()),
                _ => None,
            })
        })
}

/// Serializes queued values onto the socket, one JSON text frame each.
///
/// Stops when the queue closes or a write fails. Dropping `rx` on exit makes
/// further sends on the paired sender fail.
async fn write_frames<T: Serialize>(
    mut sink: SplitSink<WebSocket, Message>,
    mut rx: mpsc::UnboundedReceiver<T>,
) {
    while let Some(value) = rx.recv().await {
        let text = match serde_json::to_string(&value) {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Failed to encode frame");
                continue;
            }
        };
        if sink.send(Message::Text(text.into())).await.is_err() {
            debug!("Socket write failed, stopping writer");
            break;
        }
    }
    let _ = sink.close().await;
}
