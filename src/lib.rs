//! cinema-db - a shared MongoDB connection handle.
//!
//! Resolves the connection target, starts connecting without blocking, logs
//! failures instead of propagating them, and hands out a handle that is valid
//! from the moment it is created.

pub mod config;
pub mod connection;
pub mod db;
pub mod error;
pub mod logging;

pub use connection::{ConnectionHandle, ConnectionManager, ConnectionState, MongoHandle};
pub use error::{DbError, Result};
