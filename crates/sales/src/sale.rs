use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use ultimosalto_core::{
    CustomerId, DomainError, DomainResult, Entity, Money, ProductId, SaleId, SaleLineItemId,
};

use crate::coupon::Coupon;

/// Line item before storage: product, quantity, unit price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLineItem {
    pub product_id: ProductId,
    pub quantity: u32,
    /// Price actually charged per unit, after any discount.
    pub unit_price: Money,
}

impl NewLineItem {
    pub fn new(product_id: ProductId, quantity: u32, unit_price: Money) -> DomainResult<Self> {
        if quantity == 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }
        if unit_price.is_zero() {
            return Err(DomainError::validation("unit_price must be positive"));
        }
        Ok(Self {
            product_id,
            quantity,
            unit_price,
        })
    }

    pub fn subtotal(&self) -> Money {
        self.unit_price.times(self.quantity)
    }
}

/// Sale before storage, together with its line items.
///
/// The total is never stored on the struct; it is always derived from the
/// lines, so the two cannot drift apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSale {
    customer_id: CustomerId,
    sale_date: NaiveDate,
    coupon: Option<Coupon>,
    lines: Vec<NewLineItem>,
}

impl NewSale {
    pub fn new(
        customer_id: CustomerId,
        sale_date: NaiveDate,
        coupon: Option<Coupon>,
        lines: Vec<NewLineItem>,
    ) -> DomainResult<Self> {
        if lines.is_empty() {
            return Err(DomainError::validation("a sale needs at least one line item"));
        }

        let mut seen = HashSet::with_capacity(lines.len());
        if !lines.iter().all(|l| seen.insert(l.product_id)) {
            return Err(DomainError::invariant(
                "a product can appear only once per sale",
            ));
        }

        Ok(Self {
            customer_id,
            sale_date,
            coupon,
            lines,
        })
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn sale_date(&self) -> NaiveDate {
        self.sale_date
    }

    pub fn coupon(&self) -> Option<Coupon> {
        self.coupon
    }

    pub fn lines(&self) -> &[NewLineItem] {
        &self.lines
    }

    /// Σ quantity × unit price.
    pub fn total(&self) -> Money {
        self.lines.iter().map(NewLineItem::subtotal).sum()
    }
}

/// A stored sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    id: SaleId,
    customer_id: CustomerId,
    sale_date: NaiveDate,
    total: Money,
    coupon: Option<Coupon>,
}

impl Sale {
    /// Rebuild a stored sale (e.g. from a database row).
    pub fn new(
        id: SaleId,
        customer_id: CustomerId,
        sale_date: NaiveDate,
        total: Money,
        coupon: Option<Coupon>,
    ) -> Self {
        Self {
            id,
            customer_id,
            sale_date,
            total,
            coupon,
        }
    }

    pub fn from_new(id: SaleId, new: &NewSale) -> Self {
        Self::new(id, new.customer_id, new.sale_date, new.total(), new.coupon)
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn sale_date(&self) -> NaiveDate {
        self.sale_date
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn coupon(&self) -> Option<Coupon> {
        self.coupon
    }
}

impl Entity for Sale {
    type Id = SaleId;

    fn id(&self) -> SaleId {
        self.id
    }
}

/// A stored line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleLineItem {
    id: SaleLineItemId,
    sale_id: SaleId,
    product_id: ProductId,
    quantity: u32,
    unit_price: Money,
}

impl SaleLineItem {
    pub fn new(
        id: SaleLineItemId,
        sale_id: SaleId,
        product_id: ProductId,
        quantity: u32,
        unit_price: Money,
    ) -> Self {
        Self {
            id,
            sale_id,
            product_id,
            quantity,
            unit_price,
        }
    }

    pub fn sale_id(&self) -> SaleId {
        self.sale_id
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn subtotal(&self) -> Money {
        self.unit_price.times(self.quantity)
    }
}

impl Entity for SaleLineItem {
    type Id = SaleLineItemId;

    fn id(&self) -> SaleLineItemId {
        self.id
    }
}
