//! Shared core for the userhub server: configuration, error types, the
//! storage gateway boundary, and the user domain model.

pub mod config;
pub mod deps;
pub mod error;
pub mod gateway;
pub mod users;

pub use config::AppConfig;
pub use deps::ServerDeps;
pub use error::{HubError, StorageError};
pub use gateway::{Predicate, Row, StorageGateway};
pub use gateway::pg::PgGateway;
#[cfg(any(test, feature = "test-utils"))]
pub use gateway::memory::MemoryGateway;
pub use users::{topics, User, UserRepo};
