//! Parties domain module (customers).
//!
//! This crate contains the customer model and the synthetic customer
//! generator, implemented purely as deterministic domain logic (no IO, no
//! storage). Randomness always comes from a generator the caller passes in.

pub mod customer;
pub mod generator;
pub mod identity;

pub use customer::{Customer, Gender, NewCustomer};
pub use generator::{AgePolicy, CustomerGenerator};
pub use identity::{FakeIdentityProvider, Identity, IdentityProvider};
