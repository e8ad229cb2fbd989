//! Synthetic customer population.

use core::ops::RangeInclusive;

use chrono::NaiveDate;
use rand::Rng;
use rand::seq::SliceRandom;

use ultimosalto_core::{DomainError, DomainResult, birth_date_for_age};

use crate::customer::{Gender, NewCustomer};
use crate::identity::IdentityProvider;

/// Bimodal age distribution.
///
/// With probability `senior_share` an age is drawn uniformly from
/// `senior_ages`, otherwise uniformly from `adult_ages`.
#[derive(Debug, Clone, PartialEq)]
pub struct AgePolicy {
    pub senior_share: f64,
    pub senior_ages: RangeInclusive<u32>,
    pub adult_ages: RangeInclusive<u32>,
}

impl Default for AgePolicy {
    fn default() -> Self {
        Self {
            senior_share: 0.30,
            senior_ages: 61..=90,
            adult_ages: 18..=59,
        }
    }
}

impl AgePolicy {
    fn validate(&self) -> DomainResult<()> {
        if !(0.0..=1.0).contains(&self.senior_share) {
            return Err(DomainError::validation("senior_share must be within [0, 1]"));
        }
        if self.senior_ages.is_empty() || self.adult_ages.is_empty() {
            return Err(DomainError::validation("age ranges cannot be empty"));
        }
        Ok(())
    }

    pub fn draw_age<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        if rng.gen_bool(self.senior_share) {
            rng.gen_range(self.senior_ages.clone())
        } else {
            rng.gen_range(self.adult_ages.clone())
        }
    }
}

/// Produces a population of [`NewCustomer`]s relative to a fixed `today`.
#[derive(Debug, Clone)]
pub struct CustomerGenerator {
    policy: AgePolicy,
    today: NaiveDate,
}

impl CustomerGenerator {
    pub fn new(policy: AgePolicy, today: NaiveDate) -> DomainResult<Self> {
        policy.validate()?;
        Ok(Self { policy, today })
    }

    /// Generate `count` customers.
    ///
    /// Per customer the draw order is fixed: identity, cohort, age, extra days,
    /// gender. Changing it changes every dataset generated from a given seed.
    pub fn generate<R, P>(
        &self,
        count: usize,
        rng: &mut R,
        identities: &mut P,
    ) -> DomainResult<Vec<NewCustomer>>
    where
        R: Rng + ?Sized,
        P: IdentityProvider + ?Sized,
    {
        let mut customers = Vec::with_capacity(count);

        for _ in 0..count {
            let identity = identities.next_identity();
            let age = self.policy.draw_age(rng);
            let extra_days = rng.gen_range(0..365);
            let birth_date = birth_date_for_age(self.today, age, extra_days);
            let gender = *Gender::ALL
                .choose(rng)
                .ok_or_else(|| DomainError::invariant("gender set is empty"))?;

            customers.push(NewCustomer::new(
                identity.name,
                identity.email,
                birth_date,
                gender,
            )?);
        }

        Ok(customers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{FakeIdentityProvider, Identity};
    use std::collections::HashSet;
    use ultimosalto_core::{seeded_rng, whole_years_floor365};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn generator() -> CustomerGenerator {
        CustomerGenerator::new(AgePolicy::default(), today()).unwrap()
    }

    struct Sequential(u32);

    impl IdentityProvider for Sequential {
        fn next_identity(&mut self) -> Identity {
            self.0 += 1;
            Identity {
                name: format!("Cliente {}", self.0),
                email: format!("cliente{}@example.com", self.0),
            }
        }
    }

    #[test]
    fn generates_the_requested_population() {
        let customers = generator()
            .generate(250, &mut seeded_rng(42), &mut FakeIdentityProvider::new(42))
            .unwrap();
        assert_eq!(customers.len(), 250);

        let emails: HashSet<_> = customers.iter().map(|c| c.email.as_str()).collect();
        assert_eq!(emails.len(), 250);
    }

    #[test]
    fn ages_stay_within_18_and_90() {
        let customers = generator()
            .generate(20_000, &mut seeded_rng(5), &mut Sequential(0))
            .unwrap();
        let out_of_range = customers
            .iter()
            .map(|c| whole_years_floor365(c.birth_date, today()))
            .filter(|age| !(18..=90).contains(age))
            .count();
        assert_eq!(out_of_range, 0, "customers outside [18, 90]");
    }

    #[test]
    fn roughly_thirty_percent_are_over_sixty() {
        let customers = generator()
            .generate(10_000, &mut seeded_rng(42), &mut Sequential(0))
            .unwrap();
        let seniors = customers
            .iter()
            .filter(|c| whole_years_floor365(c.birth_date, today()) > 60)
            .count();
        let share = seniors as f64 / customers.len() as f64;
        assert!((0.27..=0.33).contains(&share), "senior share was {share}");
    }

    #[test]
    fn same_seed_reproduces_the_population() {
        let a = generator()
            .generate(100, &mut seeded_rng(42), &mut FakeIdentityProvider::new(42))
            .unwrap();
        let b = generator()
            .generate(100, &mut seeded_rng(42), &mut FakeIdentityProvider::new(42))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn all_genders_appear() {
        let customers = generator()
            .generate(300, &mut seeded_rng(9), &mut Sequential(0))
            .unwrap();
        let genders: HashSet<_> = customers.iter().map(|c| c.gender).collect();
        assert_eq!(genders.len(), Gender::ALL.len());
    }

    #[test]
    fn invalid_policy_is_rejected() {
        let policy = AgePolicy {
            senior_share: 1.5,
            ..AgePolicy::default()
        };
        assert!(CustomerGenerator::new(policy, today()).is_err());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 64,
                ..ProptestConfig::default()
            })]

            /// Property: a senior-only policy yields only customers over 60.
            #[test]
            fn senior_only_policy_yields_only_seniors(seed in any::<u64>()) {
                let policy = AgePolicy { senior_share: 1.0, ..AgePolicy::default() };
                let generator = CustomerGenerator::new(policy, today()).unwrap();
                let customers = generator
                    .generate(50, &mut seeded_rng(seed), &mut Sequential(0))
                    .unwrap();
                for c in &customers {
                    prop_assert!(whole_years_floor365(c.birth_date, today()) > 60);
                }
            }

            /// Property: birth dates stay within the 18 to 90 year span.
            #[test]
            fn birth_dates_are_bounded(seed in any::<u64>()) {
                let customers = generator()
                    .generate(50, &mut seeded_rng(seed), &mut Sequential(0))
                    .unwrap();
                let oldest = today() - chrono::Duration::days(90 * 365 + 364);
                let youngest = today() - chrono::Duration::days(18 * 365);
                for c in &customers {
                    prop_assert!(c.birth_date >= oldest && c.birth_date <= youngest);
                }
            }
        }
    }
}
