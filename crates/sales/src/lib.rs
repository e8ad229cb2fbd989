//! Sales domain module.
//!
//! This crate contains sales, their line items, the senior discount coupon
//! rule and the synthetic sales generator, implemented purely as deterministic
//! domain logic (no IO, no storage).

pub mod coupon;
pub mod generator;
pub mod sale;

pub use coupon::{Coupon, CouponPolicy};
pub use generator::{SaleWindow, SalesGenerator};
pub use sale::{NewLineItem, NewSale, Sale, SaleLineItem};
