//! Process-wide table of active sessions, keyed by their access tokens.

use crate::broadcast::{ConnectionId, Participant};
use crate::session::{Session, short};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use derive_more::{Display, Error};
use parking_lot::Mutex;
use rand::RngCore;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, instrument, warn};

/// Random bytes per token (128 bits of entropy).
const TOKEN_BYTES: usize = 16;

/// Registry lookup failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum RegistryError {
    /// No active session holds the presented token.
    #[display("Game not found.")]
    TokenNotFound,
}

#[derive(Debug, Default)]
struct Tokens {
    join: HashMap<String, Arc<Session>>,
    watch: HashMap<String, Arc<Session>>,
}

impl Tokens {
    fn in_use(&self, token: &str) -> bool {
        self.join.contains_key(token) || self.watch.contains_key(token)
    }

    /// Draws a token not held by any active session.
    fn fresh_token(&self) -> String {
        loop {
            let token = generate_token();
            if !self.in_use(&token) {
                return token;
            }
        }
    }
}

/// Maps join and watch tokens to sessions.
///
/// Both mappings of a session are inserted together by [`Registry::create`]
/// and removed together by [`Registry::destroy`]; nothing else mutates them.
/// Cloning shares the same table.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    tokens: Arc<Mutex<Tokens>>,
    next_connection: Arc<AtomicU64>,
}

impl Registry {
    /// Creates an empty registry.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating session registry");
        Self::default()
    }

    /// Allocates an id for a new connection.
    pub fn next_connection_id(&self) -> ConnectionId {
        self.next_connection.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Creates a session owned by `creator` and registers both of its tokens.
    #[instrument(skip_all, fields(connection = *creator.id()))]
    pub fn create(&self, creator: Participant) -> Arc<Session> {
        let mut tokens = self.tokens.lock();
        let join = tokens.fresh_token();
        let watch = loop {
            let candidate = tokens.fresh_token();
            if candidate != join {
                break candidate;
            }
        };

        let session = Arc::new(Session::new(join.clone(), watch.clone(), creator));
        tokens.join.insert(join.clone(), Arc::clone(&session));
        tokens.watch.insert(watch, Arc::clone(&session));

        info!(join = %short(&join), active = tokens.join.len(), "Session registered");
        session
    }

    /// Finds the session a join token belongs to.
    ///
    /// The token stays valid afterwards; any number of connections may
    /// present it while the session is active.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::TokenNotFound`] for unknown tokens.
    #[instrument(skip_all, fields(token = %short(token)))]
    pub fn resolve_join(&self, token: &str) -> Result<Arc<Session>, RegistryError> {
        self.tokens.lock().join.get(token).cloned().ok_or_else(|| {
            warn!("Unknown join token");
            RegistryError::TokenNotFound
        })
    }

    /// Finds the session a watch token belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::TokenNotFound`] for unknown tokens.
    #[instrument(skip_all, fields(token = %short(token)))]
    pub fn resolve_watch(&self, token: &str) -> Result<Arc<Session>, RegistryError> {
        self.tokens.lock().watch.get(token).cloned().ok_or_else(|| {
            warn!("Unknown watch token");
            RegistryError::TokenNotFound
        })
    }

    /// Removes both token mappings of `session`.
    #[instrument(skip_all, fields(join = %short(session.join_token())))]
    pub fn destroy(&self, session: &Session) {
        let mut tokens = self.tokens.lock();
        let join = tokens.join.remove(session.join_token()).is_some();
        let watch = tokens.watch.remove(session.watch_token()).is_some();
        debug!(join, watch, "Token mappings removed");
        info!(active = tokens.join.len(), "Session destroyed");
    }

    /// Number of active sessions.
    pub fn len(&self) -> usize {
        self.tokens.lock().join.len()
    }

    /// Whether no session is active.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Generates an unguessable URL-safe token.
fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
