//! Senior discount coupon.

use core::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use ultimosalto_core::{DomainError, DomainResult, Money};

/// Coupon codes stored in `ventas.cupon_usado`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Coupon {
    /// 30% off every line of the sale.
    #[serde(rename = "ULTIMO_SUSPIRO")]
    UltimoSuspiro,
}

impl Coupon {
    pub fn code(&self) -> &'static str {
        match self {
            Coupon::UltimoSuspiro => "ULTIMO_SUSPIRO",
        }
    }

    /// Share of the catalog price that is still charged, in percent.
    pub fn price_percent(&self) -> u32 {
        match self {
            Coupon::UltimoSuspiro => 70,
        }
    }

    pub fn apply(&self, price: Money) -> Money {
        price.percent(self.price_percent())
    }
}

impl core::fmt::Display for Coupon {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Coupon {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ULTIMO_SUSPIRO" => Ok(Coupon::UltimoSuspiro),
            other => Err(DomainError::validation(format!("unknown coupon code: {other}"))),
        }
    }
}

/// Who may get the coupon, and how often it is actually used.
#[derive(Debug, Clone, PartialEq)]
pub struct CouponPolicy {
    pub coupon: Coupon,
    /// Customers strictly older than this are eligible.
    pub min_age_exclusive: i64,
    /// Chance that an eligible sale uses the coupon.
    pub use_probability: f64,
}

impl Default for CouponPolicy {
    fn default() -> Self {
        Self {
            coupon: Coupon::UltimoSuspiro,
            min_age_exclusive: 60,
            use_probability: 0.70,
        }
    }
}

impl CouponPolicy {
    pub fn validate(&self) -> DomainResult<()> {
        if !(0.0..=1.0).contains(&self.use_probability) {
            return Err(DomainError::validation("use_probability must be within [0, 1]"));
        }
        Ok(())
    }

    pub fn is_eligible(&self, age: i64) -> bool {
        age > self.min_age_exclusive
    }

    /// Decide the coupon for one sale.
    ///
    /// The random draw happens only for eligible customers, so ineligible sales
    /// consume nothing from the stream.
    pub fn decide<R: Rng + ?Sized>(&self, age: i64, rng: &mut R) -> Option<Coupon> {
        if self.is_eligible(age) && rng.gen_bool(self.use_probability) {
            Some(self.coupon)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ultimosalto_core::seeded_rng;

    #[test]
    fn coupon_takes_thirty_percent_off() {
        assert_eq!(
            Coupon::UltimoSuspiro.apply(Money::from_cents(520_000)),
            Money::from_cents(364_000)
        );
    }

    #[test]
    fn sixty_is_not_eligible() {
        let policy = CouponPolicy::default();
        assert!(!policy.is_eligible(60));
        assert!(policy.is_eligible(61));

        let mut rng = seeded_rng(0);
        for _ in 0..1_000 {
            assert_eq!(policy.decide(60, &mut rng), None);
        }
    }

    #[test]
    fn eligible_customers_use_it_about_seventy_percent_of_the_time() {
        let policy = CouponPolicy::default();
        let mut rng = seeded_rng(42);
        let used = (0..10_000)
            .filter(|_| policy.decide(75, &mut rng).is_some())
            .count();
        let share = used as f64 / 10_000.0;
        assert!((0.67..=0.73).contains(&share), "coupon share was {share}");
    }

    #[test]
    fn code_parses_back() {
        assert_eq!("ULTIMO_SUSPIRO".parse::<Coupon>().unwrap(), Coupon::UltimoSuspiro);
        assert!("OTRO".parse::<Coupon>().is_err());
    }
}
