//! Infrastructure layer: SQLite storage, validation queries, seeding config.

pub mod config;
pub mod error;
pub mod report;
pub mod schema;
pub mod store;

pub use config::SeedConfig;
pub use error::{ConstraintKind, StoreError};
pub use report::{IntegrityAudit, ValidationReport};
pub use store::SqliteStore;
