//! Mock drivers for testing.
//!
//! Provide in-memory connection outcomes without a MongoDB server.

use super::Driver;
use crate::config::{database_from_target, ConnectOptions, DEFAULT_DATABASE};
use crate::error::{DbError, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// In-memory stand-in for the server behind a [`MockClient`].
#[derive(Debug, Default)]
struct MockServer {
    unavailable_pings: AtomicUsize,
    pings: AtomicUsize,
}

/// Client handed out by [`MockDriver`].
#[derive(Debug, Clone)]
pub struct MockClient {
    /// Target the client was opened with.
    pub target: String,
    /// Database named by the target.
    pub database: String,
    server: Arc<MockServer>,
}

impl MockClient {
    /// Pings the mock server. Fails while the server is still unavailable.
    pub async fn ping(&self) -> Result<()> {
        self.server.pings.fetch_add(1, Ordering::SeqCst);

        let unavailable = self
            .server
            .unavailable_pings
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();

        if unavailable {
            Err(DbError::connection("server selection timed out"))
        } else {
            Ok(())
        }
    }

    /// Number of pings sent through this client and its clones.
    pub fn pings(&self) -> usize {
        self.server.pings.load(Ordering::SeqCst)
    }
}

/// A driver that always opens a client, optionally checking it slowly or
/// against a server that is not up yet.
#[derive(Debug, Clone, Default)]
pub struct MockDriver {
    delay: Duration,
    unavailable_pings: usize,
    attempts: Arc<AtomicUsize>,
}

impl MockDriver {
    /// Creates a mock driver whose check succeeds immediately.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock driver whose check takes `delay`.
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    /// The first `count` pings on each opened client fail, as if the server
    /// came up late.
    pub fn unavailable_for(mut self, count: usize) -> Self {
        self.unavailable_pings = count;
        self
    }

    /// Number of clients opened so far, across clones.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Driver for MockDriver {
    type Client = MockClient;

    async fn open(&self, target: &str, _options: &ConnectOptions) -> Result<MockClient> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        Ok(MockClient {
            target: target.to_string(),
            database: database_from_target(target).unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
            server: Arc::new(MockServer {
                unavailable_pings: AtomicUsize::new(self.unavailable_pings),
                pings: AtomicUsize::new(0),
            }),
        })
    }

    async fn check(&self, client: &MockClient) -> Result<()> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        client.ping().await
    }
}

/// A driver that cannot build a client, like a malformed target.
#[derive(Debug, Clone)]
pub struct FailingDriver {
    message: String,
    delay: Duration,
}

impl FailingDriver {
    /// Creates a driver that fails immediately with `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            delay: Duration::ZERO,
        }
    }

    /// Fails only after `delay`, like a slow SRV lookup.
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl Driver for FailingDriver {
    type Client = MockClient;

    async fn open(&self, _target: &str, _options: &ConnectOptions) -> Result<MockClient> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Err(DbError::connection(self.message.clone()))
    }

    async fn check(&self, _client: &MockClient) -> Result<()> {
        Err(DbError::internal("no client can be opened"))
    }
}
