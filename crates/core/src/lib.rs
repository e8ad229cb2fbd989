//! `ultimosalto-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod age;
pub mod entity;
pub mod error;
pub mod id;
pub mod rng;
pub mod value_object;

pub use age::{birth_date_for_age, exact_years, whole_years_floor365};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{CustomerId, ProductId, SaleId, SaleLineItemId};
pub use rng::{SeedRng, seeded_rng};
pub use value_object::{Money, ValueObject};
