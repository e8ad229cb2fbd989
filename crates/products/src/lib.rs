//! Products domain module (catalog).
//!
//! This crate contains the product model and the fixed, hand-authored catalog
//! of the store. No randomness and no IO.

pub mod catalog;
pub mod product;

pub use catalog::catalog;
pub use product::{Category, NewProduct, Product};
