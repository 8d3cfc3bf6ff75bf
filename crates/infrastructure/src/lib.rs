//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer: SQLite persistence,
//! filesystem avatar storage, the shared session state, plus configuration
//! and telemetry bootstrap.

pub mod adapters;
pub mod config;
pub mod persistence;
pub mod telemetry;

pub use adapters::{FsAvatarStorage, StoreBackedSessionProvider};
pub use config::{
    AccessTokenEntry, AppConfig, DatabaseConfig, Environment, SecurityConfig, ServerConfig,
    StorageConfig,
};
pub use persistence::{ConnectionPool, DatabaseError, SqliteProfileStore, create_pool};
pub use telemetry::{TelemetryConfig, init_telemetry};
