//! Connection manager: best-effort, non-blocking initialization.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info};

use super::ConnectionHandle;
use crate::config::ConnectOptions;
use crate::db::Driver;
use crate::error::{DbError, Result};

/// Starts connection attempts through a driver.
pub struct ConnectionManager<D: Driver> {
    driver: Arc<D>,
    options: ConnectOptions,
}

/// A freshly initialized handle and the status of its connection attempt.
pub struct Initialization<C> {
    /// Usable immediately, whatever the attempt's outcome.
    pub handle: ConnectionHandle<C>,
    /// Status of the background attempt. May be dropped.
    pub pending: PendingConnection,
}

/// Outcome of a background connection attempt.
///
/// Dropping it detaches the attempt; failures have already been logged.
#[derive(Debug)]
pub struct PendingConnection {
    inner: Pending,
}

#[derive(Debug)]
enum Pending {
    Running(JoinHandle<Result<()>>),
    Settled(Option<DbError>),
}

impl PendingConnection {
    fn running(task: JoinHandle<Result<()>>) -> Self {
        Self {
            inner: Pending::Running(task),
        }
    }

    fn failed(error: DbError) -> Self {
        Self {
            inner: Pending::Settled(Some(error)),
        }
    }

    /// Returns true once the attempt has finished.
    pub fn is_finished(&self) -> bool {
        match &self.inner {
            Pending::Running(task) => task.is_finished(),
            Pending::Settled(_) => true,
        }
    }

    /// Waits for the attempt and returns its result.
    pub async fn outcome(self) -> Result<()> {
        match self.inner {
            Pending::Running(task) => task
                .await
                .map_err(|e| DbError::internal(format!("connection task did not finish: {e}")))?,
            Pending::Settled(None) => Ok(()),
            Pending::Settled(Some(e)) => Err(e),
        }
    }
}

impl<D: Driver> ConnectionManager<D> {
    /// Creates a manager using the default driver options.
    pub fn new(driver: D) -> Self {
        Self::with_options(driver, ConnectOptions::default())
    }

    pub fn with_options(driver: D, options: ConnectOptions) -> Self {
        Self {
            driver: Arc::new(driver),
            options,
        }
    }

    /// Options handed to the driver on every attempt.
    pub fn options(&self) -> &ConnectOptions {
        &self.options
    }

    /// Creates a handle for `target` and starts connecting in the background.
    ///
    /// Returns without waiting on the network. A failed attempt is logged
    /// once and recorded on the handle; it never propagates out of this call.
    /// Must be called from within a tokio runtime, otherwise the handle is
    /// returned already errored.
    pub fn initialize(&self, target: impl Into<String>) -> Initialization<D::Client> {
        let handle = ConnectionHandle::new(target.into());
        let pending = self.start(&handle);
        Initialization { handle, pending }
    }

    /// Starts the background attempt for a handle that has not been started.
    ///
    /// The task first has the driver build the client and publishes it on
    /// the handle, then checks the server. A failed check leaves the client
    /// in place for later operations.
    pub(crate) fn start(&self, handle: &ConnectionHandle<D::Client>) -> PendingConnection {
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                let err = DbError::internal(format!("no async runtime to connect on: {e}"));
                error!(target_uri = %handle.display_target(), "{err}");
                handle.fail(&err);
                return PendingConnection::failed(err);
            }
        };

        if !handle.begin() {
            return PendingConnection::failed(DbError::internal(
                "connection attempt already started",
            ));
        }
        info!(target_uri = %handle.display_target(), "Connecting to database");

        let driver = Arc::clone(&self.driver);
        let options = self.options.clone();
        let task_handle = handle.clone();

        let task = runtime.spawn(async move {
            let client = match driver.open(task_handle.target(), &options).await {
                Ok(client) => client,
                Err(e) => return report_failure(&task_handle, e),
            };
            task_handle.set_client(client.clone());

            match driver.check(&client).await {
                Ok(()) => {
                    task_handle.mark_connected();
                    info!(target_uri = %task_handle.display_target(), "Connected to database");
                    Ok(())
                }
                Err(e) => report_failure(&task_handle, e),
            }
        });

        PendingConnection::running(task)
    }
}

fn report_failure<C>(handle: &ConnectionHandle<C>, e: DbError) -> Result<()> {
    error!(target_uri = %handle.display_target(), "{e}");
    handle.fail(&e);
    Err(e)
}
