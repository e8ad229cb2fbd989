//! Seeding pipeline for the "El Último Salto" store database.
//!
//! Stages run in a fixed order and each commits its own transaction:
//! schema, customers, catalog, sales, validation. The first failure stops the
//! run; stages already committed stay in the database.

pub mod error;
pub mod pipeline;

pub use error::{SeedError, Stage};
pub use pipeline::{Progress, SeedSummary, run, seed};
