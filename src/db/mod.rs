//! Database driver layer for cinema-db.
//!
//! Provides a trait-based seam between the connection manager and the driver
//! that actually opens connections, so the lifecycle can be exercised against
//! mock drivers as well as a live MongoDB server.

mod mock;
mod mongo;

pub use mock::{FailingDriver, MockClient, MockDriver};
pub use mongo::{MongoClient, MongoDriver};

use crate::config::ConnectOptions;
use crate::error::Result;
use async_trait::async_trait;

/// Trait defining the driver's two connection steps.
///
/// `open` builds a client without waiting on the server. `check` confirms the
/// server answers. A client that failed its check stays usable: the driver
/// retries server selection on every later operation. Pooling, timeouts and
/// reconnection are the driver's own business.
#[async_trait]
pub trait Driver: Send + Sync + 'static {
    /// Client type through which database operations are issued.
    type Client: Clone + Send + Sync + 'static;

    /// Builds a client for `target`. Fails only when no client can be built,
    /// e.g. for a malformed target.
    async fn open(&self, target: &str, options: &ConnectOptions) -> Result<Self::Client>;

    /// Checks that the server behind `client` is reachable.
    async fn check(&self, client: &Self::Client) -> Result<()>;
}
