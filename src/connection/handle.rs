//! The shared connection handle.

use std::sync::Arc;

use tokio::sync::watch;

use super::ConnectionState;
use crate::config::redact_target;
use crate::error::{DbError, Result};

/// Long-lived reference through which database operations are issued.
///
/// Clones share the same target, state and client. Holding a handle says
/// nothing about whether the server is reachable: the client is available as
/// soon as the driver has built it, while the state still reads `Connecting`
/// and also after an `Errored` check. Operations issued through it are left
/// to the driver, which waits on server selection or fails them.
pub struct ConnectionHandle<C> {
    inner: Arc<HandleInner<C>>,
}

struct HandleInner<C> {
    target: String,
    state: watch::Sender<ConnectionState>,
    client: watch::Sender<Option<C>>,
}

impl<C> Clone for ConnectionHandle<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C> std::fmt::Debug for ConnectionHandle<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionHandle")
            .field("target", &self.display_target())
            .field("state", &*self.inner.state.borrow())
            .field("has_client", &self.inner.client.borrow().is_some())
            .finish()
    }
}

impl<C> ConnectionHandle<C> {
    /// Creates a disconnected handle for `target`.
    pub(crate) fn new(target: String) -> Self {
        let (state, _) = watch::channel(ConnectionState::Disconnected);
        let (client, _) = watch::channel(None);
        Self {
            inner: Arc::new(HandleInner {
                target,
                state,
                client,
            }),
        }
    }

    /// The resolved target the handle was opened with.
    pub fn target(&self) -> &str {
        &self.inner.target
    }

    /// The target with credentials redacted.
    pub fn display_target(&self) -> String {
        redact_target(&self.inner.target)
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> ConnectionState {
        self.inner.state.borrow().clone()
    }

    pub fn is_connected(&self) -> bool {
        matches!(*self.inner.state.borrow(), ConnectionState::Connected)
    }

    /// Subscribes to state changes.
    pub fn subscribe(&self) -> watch::Receiver<ConnectionState> {
        self.inner.state.subscribe()
    }

    /// Returns true if both handles refer to the same connection.
    pub fn same_handle(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Moves `Disconnected` to `Connecting`. Returns false if the handle
    /// already left `Disconnected`.
    pub(crate) fn begin(&self) -> bool {
        self.inner.state.send_if_modified(|state| {
            if *state == ConnectionState::Disconnected {
                *state = ConnectionState::Connecting;
                true
            } else {
                false
            }
        })
    }

    /// Publishes the driver client. Set before the state settles.
    pub(crate) fn set_client(&self, client: C) {
        self.inner.client.send_replace(Some(client));
    }

    pub(crate) fn mark_connected(&self) {
        self.inner.state.send_replace(ConnectionState::Connected);
    }

    pub(crate) fn fail(&self, error: &DbError) {
        self.inner.state.send_replace(ConnectionState::Errored {
            message: error.message().to_string(),
        });
    }
}

impl<C: Clone> ConnectionHandle<C> {
    /// Returns the driver client, if the driver has built one.
    pub fn client(&self) -> Option<C> {
        self.inner.client.borrow().clone()
    }

    /// Waits until the driver client is available.
    ///
    /// Resolves as soon as the client is built, even if the server has not
    /// answered yet. Fails only if the attempt ended without a client.
    pub async fn wait_for_client(&self) -> Result<C> {
        let mut clients = self.inner.client.subscribe();
        let mut states = self.inner.state.subscribe();

        loop {
            // Read the state first: the client is always published before
            // the state settles.
            let state = states.borrow_and_update().clone();
            if let Some(client) = clients.borrow_and_update().clone() {
                return Ok(client);
            }

            match state {
                ConnectionState::Errored { message } => return Err(DbError::connection(message)),
                ConnectionState::Connected => {
                    return Err(DbError::internal("connected handle has no client"))
                }
                ConnectionState::Disconnected | ConnectionState::Connecting => {}
            }

            let changed = tokio::select! {
                changed = clients.changed() => changed,
                changed = states.changed() => changed,
            };
            changed.map_err(|_| DbError::internal("connection handle closed"))?;
        }
    }
}
