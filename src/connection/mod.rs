//! Connection management for cinema-db.
//!
//! Owns the connection lifecycle: one handle per target, created immediately,
//! connected in the background, and optionally published as process-wide
//! shared state.

pub mod handle;
pub mod manager;
pub mod state;

pub use handle::ConnectionHandle;
pub use manager::{ConnectionManager, Initialization, PendingConnection};
pub use state::ConnectionState;

use std::sync::OnceLock;

use crate::config;
use crate::db::{MongoClient, MongoDriver};
use crate::error::{DbError, Result};

/// Handle type for the MongoDB driver.
pub type MongoHandle = ConnectionHandle<MongoClient>;

static SHARED: OnceLock<MongoHandle> = OnceLock::new();

/// Publishes `handle` as the process-wide connection.
///
/// Only one handle can be installed per process.
pub fn install_shared(handle: MongoHandle) -> Result<&'static MongoHandle> {
    SHARED.set(handle).map_err(|_| DbError::AlreadyInitialized)?;
    shared().ok_or_else(|| DbError::internal("shared handle missing after install"))
}

/// Returns the process-wide connection, if one has been installed.
pub fn shared() -> Option<&'static MongoHandle> {
    SHARED.get()
}

/// Resolves the target from `MONGO_URI`, installs a handle for it as the
/// process-wide connection, and starts connecting in the background.
///
/// The handle is installed before any attempt starts, so concurrent callers
/// that lose the install never spawn one. Connection failures do not make
/// this fail; they are logged and recorded on the handle. Errors only if a
/// shared handle already exists.
pub fn initialize_shared() -> Result<(&'static MongoHandle, PendingConnection)> {
    let handle = install_shared(MongoHandle::new(config::target_from_env()))?;
    let pending = ConnectionManager::new(MongoDriver).start(handle);

    Ok((handle, pending))
}
