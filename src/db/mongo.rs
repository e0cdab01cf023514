//! MongoDB driver implementation.
//!
//! Provides the `MongoDriver` struct that implements the `Driver` trait using
//! the official `mongodb` crate.

use super::Driver;
use crate::config::{ConnectOptions, APP_NAME, DEFAULT_DATABASE};
use crate::error::{DbError, Result};
use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};
use tracing::debug;

/// A MongoDB client and the database its target names.
///
/// The client survives failed pings; each operation issued through it runs
/// its own server selection.
#[derive(Debug, Clone)]
pub struct MongoClient {
    client: Client,
    default_database: String,
}

impl MongoClient {
    /// Returns the underlying driver client.
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Returns a handle to the target's database.
    pub fn database(&self) -> Database {
        self.client.database(&self.default_database)
    }

    /// Name of the target's database (`cinema` when the target names none).
    pub fn default_database_name(&self) -> &str {
        &self.default_database
    }

    /// Pings the server through the `admin` database.
    pub async fn ping(&self) -> Result<()> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(map_connection_error)?;
        Ok(())
    }
}

/// Driver backed by the `mongodb` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct MongoDriver;

#[async_trait]
impl Driver for MongoDriver {
    type Client = MongoClient;

    async fn open(&self, target: &str, options: &ConnectOptions) -> Result<MongoClient> {
        if !options.use_new_url_parser {
            debug!("Legacy URL parser requested; the driver has a single parser");
        }

        // Async only for mongodb+srv targets, which need a DNS lookup.
        let mut client_options = ClientOptions::parse(target)
            .await
            .map_err(map_connection_error)?;
        client_options
            .app_name
            .get_or_insert_with(|| APP_NAME.to_string());

        let default_database = client_options
            .default_database
            .clone()
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string());

        // Connects lazily; no server contact happens here.
        let client = Client::with_options(client_options).map_err(map_connection_error)?;

        Ok(MongoClient {
            client,
            default_database,
        })
    }

    async fn check(&self, client: &MongoClient) -> Result<()> {
        client.ping().await?;
        debug!("Ping succeeded");
        Ok(())
    }
}

fn map_connection_error(e: mongodb::error::Error) -> DbError {
    DbError::connection(e.to_string())
}
