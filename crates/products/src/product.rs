use core::str::FromStr;

use serde::{Deserialize, Serialize};

use ultimosalto_core::{DomainError, DomainResult, Entity, Money, ProductId};

/// Catalog category, stored as its label in `productos.categoria`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Paracaídas")]
    Parachutes,
    #[serde(rename = "Accesorios")]
    Accessories,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Parachutes => "Paracaídas",
            Category::Accessories => "Accesorios",
        }
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Paracaídas" => Ok(Category::Parachutes),
            "Accesorios" => Ok(Category::Accessories),
            other => Err(DomainError::validation(format!("unknown category: {other}"))),
        }
    }
}

/// A catalog entry that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub category: Category,
    pub price: Money,
    /// Stock is carried for completeness; sales never read or decrement it.
    pub stock: u32,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, category: Category, price: Money) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("product name cannot be empty"));
        }
        if price.is_zero() {
            return Err(DomainError::validation("price must be positive"));
        }
        Ok(Self {
            name,
            category,
            price,
            stock: 0,
        })
    }
}

/// A stored product. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    name: String,
    category: Category,
    price: Money,
    stock: u32,
}

impl Product {
    pub fn from_new(id: ProductId, new: NewProduct) -> Self {
        Self {
            id,
            name: new.name,
            category: new.category,
            price: new.price,
            stock: new.stock,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn price(&self) -> Money {
        self.price
    }

    pub fn stock(&self) -> u32 {
        self.stock
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> ProductId {
        self.id
    }
}
