//! Value objects: equality by value, not identity.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// build a new one.
///
/// - **Value Object**: `Money::from_cents(350_000)` equals any other 3500.00
/// - **Entity**: a `Customer` with id 7 is the same customer whatever its name
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}

/// Currency amount in the smallest unit (cents).
///
/// Storage keeps prices as `REAL` with two decimals; the domain keeps them as
/// integers so that a sale total is always exactly the sum of its lines.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(u64);

impl ValueObject for Money {}

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Convert a decimal amount (e.g. a `REAL` column) to cents, rounding to
    /// the nearest cent.
    pub fn from_decimal(amount: f64) -> DomainResult<Self> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(DomainError::validation(format!(
                "money amount must be a finite non-negative number, got {amount}"
            )));
        }
        Ok(Self((amount * 100.0).round() as u64))
    }

    pub fn cents(&self) -> u64 {
        self.0
    }

    /// Amount with two decimals, as stored in the database.
    pub fn to_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Scale by `percent` / 100, rounding half up to the nearest cent.
    pub fn percent(&self, percent: u32) -> Self {
        Self((self.0 * u64::from(percent) + 50) / 100)
    }

    pub fn times(&self, quantity: u32) -> Self {
        Self(self.0 * u64::from(quantity))
    }
}

impl core::ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl core::ops::AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl core::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

/// Renders as `$1,234.56`.
impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let units = (self.0 / 100).to_string();
        let mut grouped = String::with_capacity(units.len() + units.len() / 3);
        for (i, ch) in units.chars().enumerate() {
            if i > 0 && (units.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        write!(f, "${}.{:02}", grouped, self.0 % 100)
    }
}
