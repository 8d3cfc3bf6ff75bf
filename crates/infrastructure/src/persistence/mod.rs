//! Persistence module
//!
//! SQLite-based storage for profile records.

pub mod connection;
pub mod migrations;
pub mod profile_store;

pub use connection::{ConnectionPool, DatabaseError, create_pool};
pub use profile_store::SqliteProfileStore;
