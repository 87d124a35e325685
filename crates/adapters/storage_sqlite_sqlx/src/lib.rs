//! # controlhub-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the repository port traits defined in `controlhub-app::ports`
//!   (`AclRepository`, `ScriptRepository`)
//! - Implement the `ConfigurationManager` and `Scheduler` ports
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//!
//! ## Dependency rule
//! Depends on `controlhub-app` (for port traits) and `controlhub-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod acl_repo;
mod configuration;
mod error;
mod pool;
mod scheduler;
mod script_repo;

pub use acl_repo::SqliteAclRepository;
pub use configuration::SqliteConfigurationManager;
pub use error::StorageError;
pub use pool::{Config, Database};
pub use scheduler::SqliteScheduler;
pub use script_repo::SqliteScriptRepository;
