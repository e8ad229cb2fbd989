//! Synthetic sales with the senior coupon rule.

use core::ops::RangeInclusive;

use chrono::NaiveDate;
use rand::Rng;
use rand::seq::SliceRandom;

use ultimosalto_core::{DomainError, DomainResult, Entity};
use ultimosalto_parties::Customer;
use ultimosalto_products::Product;

use crate::coupon::CouponPolicy;
use crate::sale::{NewLineItem, NewSale};

/// Inclusive range of possible sale dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaleWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl SaleWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> DomainResult<Self> {
        if end < start {
            return Err(DomainError::validation(format!(
                "sale window ends ({end}) before it starts ({start})"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        (self.start..=self.end).contains(&date)
    }

    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> NaiveDate {
        let span = (self.end - self.start).num_days();
        self.start + chrono::Duration::days(rng.gen_range(0..=span))
    }
}

/// Produces sales for already-stored customers and products.
#[derive(Debug, Clone)]
pub struct SalesGenerator {
    window: SaleWindow,
    coupons: CouponPolicy,
    today: NaiveDate,
    lines_per_sale: RangeInclusive<usize>,
    quantity: RangeInclusive<u32>,
}

impl SalesGenerator {
    /// `today` is the reference date for customer ages (not the sale date).
    pub fn new(window: SaleWindow, coupons: CouponPolicy, today: NaiveDate) -> DomainResult<Self> {
        coupons.validate()?;
        Ok(Self {
            window,
            coupons,
            today,
            lines_per_sale: 1..=3,
            quantity: 1..=2,
        })
    }

    /// Generate exactly `count` sales.
    ///
    /// Customers are first put in a random order, then each sale draws, in
    /// order: customer, date, coupon (eligible customers only), line count,
    /// distinct products, and one quantity per product.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        count: usize,
        customers: &[Customer],
        products: &[Product],
        rng: &mut R,
    ) -> DomainResult<Vec<NewSale>> {
        if count > 0 && customers.is_empty() {
            return Err(DomainError::validation("cannot generate sales without customers"));
        }
        if count > 0 && products.is_empty() {
            return Err(DomainError::validation("cannot generate sales without products"));
        }

        let mut pool: Vec<&Customer> = customers.iter().collect();
        pool.shuffle(rng);

        let mut sales = Vec::with_capacity(count);
        for _ in 0..count {
            let customer = *pool
                .choose(rng)
                .ok_or_else(|| DomainError::invariant("customer pool is empty"))?;
            let sale_date = self.window.draw(rng);

            let age = customer.age_on(self.today);
            let coupon = self.coupons.decide(age, rng);

            let wanted = rng.gen_range(self.lines_per_sale.clone());
            let chosen: Vec<&Product> = products
                .choose_multiple(rng, wanted.min(products.len()))
                .collect();

            let mut lines = Vec::with_capacity(chosen.len());
            for product in chosen {
                let quantity = rng.gen_range(self.quantity.clone());
                let unit_price = match coupon {
                    Some(c) => c.apply(product.price()),
                    None => product.price(),
                };
                lines.push(NewLineItem::new(product.id(), quantity, unit_price)?);
            }

            sales.push(NewSale::new(customer.id(), sale_date, coupon, lines)?);
        }

        Ok(sales)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};
    use ultimosalto_core::{CustomerId, Money, ProductId, seeded_rng, whole_years_floor365};
    use ultimosalto_parties::{Gender, NewCustomer};
    use ultimosalto_products::catalog;

    use crate::coupon::Coupon;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn window() -> SaleWindow {
        SaleWindow::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
        )
        .unwrap()
    }

    fn generator() -> SalesGenerator {
        SalesGenerator::new(window(), CouponPolicy::default(), today()).unwrap()
    }

    fn customer(id: i64, age: u32) -> Customer {
        let birth = ultimosalto_core::birth_date_for_age(today(), age, 30);
        let new = NewCustomer::new(
            format!("Cliente {id}"),
            format!("c{id}@example.com"),
            birth,
            Gender::Female,
        )
        .unwrap();
        Customer::from_new(CustomerId::new(id).unwrap(), new)
    }

    fn customers() -> Vec<Customer> {
        (1..=40).map(|i| customer(i, 20 + (i as u32 * 7) % 70)).collect()
    }

    fn products() -> Vec<Product> {
        catalog()
            .unwrap()
            .into_iter()
            .enumerate()
            .map(|(i, p)| Product::from_new(ProductId::new(i as i64 + 1).unwrap(), p))
            .collect()
    }

    #[test]
    fn generates_exactly_the_requested_count() {
        let sales = generator()
            .generate(1250, &customers(), &products(), &mut seeded_rng(42))
            .unwrap();
        assert_eq!(sales.len(), 1250);
    }

    #[test]
    fn coupons_only_for_customers_over_sixty() {
        let customers = customers();
        let by_id: HashMap<_, _> = customers.iter().map(|c| (c.id(), c)).collect();
        let sales = generator()
            .generate(2000, &customers, &products(), &mut seeded_rng(1))
            .unwrap();

        let mut with_coupon = 0;
        for sale in &sales {
            if sale.coupon().is_some() {
                with_coupon += 1;
                let age = whole_years_floor365(by_id[&sale.customer_id()].birth_date(), today());
                assert!(age > 60, "coupon given to a {age}-year-old");
            }
        }
        assert!(with_coupon > 0);
        assert!(with_coupon < sales.len());
    }

    #[test]
    fn coupon_lines_cost_seventy_percent_of_catalog() {
        let products = products();
        let prices: HashMap<_, _> = products.iter().map(|p| (p.id(), p.price())).collect();
        let sales = generator()
            .generate(1000, &customers(), &products, &mut seeded_rng(3))
            .unwrap();

        for sale in &sales {
            for line in sale.lines() {
                let catalog_price = prices[&line.product_id];
                let expected = match sale.coupon() {
                    Some(Coupon::UltimoSuspiro) => catalog_price.percent(70),
                    None => catalog_price,
                };
                assert_eq!(line.unit_price, expected);
            }
        }
    }

    #[test]
    fn dates_fall_inside_the_window() {
        let sales = generator()
            .generate(500, &customers(), &products(), &mut seeded_rng(8))
            .unwrap();
        assert!(sales.iter().all(|s| window().contains(s.sale_date())));
    }

    #[test]
    fn young_population_never_gets_a_coupon() {
        let young: Vec<_> = (1..=10).map(|i| customer(i, 25)).collect();
        let sales = generator()
            .generate(300, &young, &products(), &mut seeded_rng(11))
            .unwrap();
        assert!(sales.iter().all(|s| s.coupon().is_none()));
    }

    #[test]
    fn small_catalog_caps_line_count() {
        let one: Vec<_> = products().into_iter().take(1).collect();
        let sales = generator()
            .generate(50, &customers(), &one, &mut seeded_rng(2))
            .unwrap();
        assert!(sales.iter().all(|s| s.lines().len() == 1));
    }

    #[test]
    fn empty_inputs_are_rejected_unless_nothing_is_requested() {
        assert!(generator().generate(1, &[], &products(), &mut seeded_rng(0)).is_err());
        assert!(generator().generate(1, &customers(), &[], &mut seeded_rng(0)).is_err());
        assert!(generator().generate(0, &[], &[], &mut seeded_rng(0)).unwrap().is_empty());
    }

    #[test]
    fn inverted_window_is_rejected() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert!(SaleWindow::new(start, end).is_err());
    }

    #[test]
    fn same_seed_reproduces_the_sales() {
        let a = generator()
            .generate(200, &customers(), &products(), &mut seeded_rng(42))
            .unwrap();
        let b = generator()
            .generate(200, &customers(), &products(), &mut seeded_rng(42))
            .unwrap();
        assert_eq!(a, b);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 128,
                ..ProptestConfig::default()
            })]

            /// Property: every sale has 1..=3 distinct products, quantities 1..=2,
            /// and a total equal to the sum of its lines.
            #[test]
            fn sales_respect_line_bounds_and_totals(seed in any::<u64>(), count in 1usize..200) {
                let sales = generator()
                    .generate(count, &customers(), &products(), &mut seeded_rng(seed))
                    .unwrap();
                prop_assert_eq!(sales.len(), count);

                for sale in &sales {
                    prop_assert!((1..=3).contains(&sale.lines().len()));
                    let distinct: HashSet<_> = sale.lines().iter().map(|l| l.product_id).collect();
                    prop_assert_eq!(distinct.len(), sale.lines().len());

                    let mut total = Money::ZERO;
                    for line in sale.lines() {
                        prop_assert!((1..=2).contains(&line.quantity));
                        total += line.unit_price.times(line.quantity);
                    }
                    prop_assert_eq!(sale.total(), total);
                }
            }
        }
    }
}
