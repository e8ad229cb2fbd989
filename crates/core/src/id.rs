//! Strongly-typed row identifiers.
//!
//! Identity is assigned by the storage engine (`INTEGER PRIMARY KEY
//! AUTOINCREMENT`); the domain only wraps the resulting row id so that a
//! customer id can never be passed where a product id is expected.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a stored customer (`clientes.id_cliente`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(i64);

/// Identifier of a catalog product (`productos.id_producto`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(i64);

/// Identifier of a sale (`ventas.id_venta`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SaleId(i64);

/// Identifier of a sale line item (`detalle_ventas.id_detalle`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SaleLineItemId(i64);

macro_rules! impl_row_id_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Wrap a row id produced by the storage engine.
            ///
            /// Row ids start at 1; zero and negative values are rejected.
            pub fn new(row_id: i64) -> Result<Self, DomainError> {
                if row_id <= 0 {
                    return Err(DomainError::invalid_id(format!(
                        "{}: row id must be positive, got {}",
                        $name, row_id
                    )));
                }
                Ok(Self(row_id))
            }

            pub fn get(&self) -> i64 {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl TryFrom<i64> for $t {
            type Error = DomainError;

            fn try_from(value: i64) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$t> for i64 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let row_id = i64::from_str(s)
                    .map_err(|e| DomainError::invalid_id(format!("{}: {}", $name, e)))?;
                Self::new(row_id)
            }
        }
    };
}

impl_row_id_newtype!(CustomerId, "CustomerId");
impl_row_id_newtype!(ProductId, "ProductId");
impl_row_id_newtype!(SaleId, "SaleId");
impl_row_id_newtype!(SaleLineItemId, "SaleLineItemId");
