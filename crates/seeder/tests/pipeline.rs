//! End-to-end seeding against in-memory SQLite.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use ultimosalto_core::{Entity, Money, whole_years_floor365};
use ultimosalto_infra::{SeedConfig, SqliteStore};
use ultimosalto_seeder::{SeedSummary, seed};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
}

async fn seeded(config: &SeedConfig) -> (SqliteStore, SeedSummary) {
    let mut store = SqliteStore::connect(&config.database_url).await.unwrap();
    let summary = seed(&mut store, config, today(), &mut ()).await.unwrap();
    (store, summary)
}

#[tokio::test]
async fn default_scenario_produces_a_consistent_store() {
    let config = SeedConfig::in_memory();
    let (mut store, summary) = seeded(&config).await;

    assert_eq!(summary.customers, 250);
    assert_eq!(summary.products, 15);
    assert_eq!(summary.sales, 1250);
    assert!((1250..=3750).contains(&summary.line_items));

    let report = &summary.report;
    assert_eq!(report.customers, 250);
    assert_eq!(report.products, 15);
    assert_eq!(report.sales, 1250);
    assert_eq!(report.line_items, summary.line_items as u64);
    assert!(report.coupons_applied > 0);
    assert!(report.coupons_applied < report.sales);
    assert!(report.coupon_customers_over_60 > 0);
    assert!(report.discounted_revenue < report.revenue);
    assert!(report.audit.is_clean(), "audit: {:?}", report.audit);

    let sales = store.list_sales().await.unwrap();
    let window = config.window_start..=config.window_end;
    assert!(sales.iter().all(|s| window.contains(&s.sale_date())));
    store.close().await.unwrap();
}

#[tokio::test]
async fn customer_ages_follow_the_senior_share() {
    let (mut store, _) = seeded(&SeedConfig::in_memory()).await;
    let customers = store.list_customers().await.unwrap();

    let ages: Vec<i64> = customers
        .iter()
        .map(|c| whole_years_floor365(c.birth_date(), today()))
        .collect();
    assert!(ages.iter().all(|a| (18..=90).contains(a)), "ages: {ages:?}");

    let seniors = ages.iter().filter(|&&a| a > 60).count() as f64 / ages.len() as f64;
    assert!((0.15..=0.45).contains(&seniors), "senior share was {seniors}");

    let emails: HashSet<_> = customers.iter().map(|c| c.email().to_string()).collect();
    assert_eq!(emails.len(), customers.len());
}

#[tokio::test]
async fn coupons_go_only_to_seniors_at_seventy_percent_of_catalog() {
    let (mut store, _) = seeded(&SeedConfig::in_memory()).await;

    let customers: HashMap<_, _> = store
        .list_customers()
        .await
        .unwrap()
        .into_iter()
        .map(|c| (c.id(), c))
        .collect();
    let prices: HashMap<_, _> = store
        .list_products()
        .await
        .unwrap()
        .into_iter()
        .map(|p| (p.id(), p.price()))
        .collect();
    let sales: HashMap<_, _> = store
        .list_sales()
        .await
        .unwrap()
        .into_iter()
        .map(|s| (s.id(), s))
        .collect();

    for sale in sales.values().filter(|s| s.coupon().is_some()) {
        let age = whole_years_floor365(customers[&sale.customer_id()].birth_date(), today());
        assert!(age > 60, "sale {} has a coupon for a {age}-year-old", sale.id());
    }

    let mut line_totals: HashMap<_, Money> = HashMap::new();
    let mut products_per_sale: HashMap<_, HashSet<_>> = HashMap::new();
    for line in store.list_line_items().await.unwrap() {
        let sale = &sales[&line.sale_id()];
        let catalog_price = prices[&line.product_id()];
        let expected = match sale.coupon() {
            Some(coupon) => coupon.apply(catalog_price),
            None => catalog_price,
        };
        assert_eq!(line.unit_price(), expected);
        assert!((1..=2).contains(&line.quantity()));

        *line_totals.entry(line.sale_id()).or_default() += line.subtotal();
        assert!(products_per_sale.entry(line.sale_id()).or_default().insert(line.product_id()));
    }

    for sale in sales.values() {
        assert_eq!(line_totals[&sale.id()], sale.total());
        assert!((1..=3).contains(&products_per_sale[&sale.id()].len()));
    }
}

#[tokio::test]
async fn same_seed_reproduces_the_customer_population() {
    let config = SeedConfig {
        customers: 80,
        sales: 120,
        ..SeedConfig::in_memory()
    };
    let (mut first, _) = seeded(&config).await;
    let (mut second, _) = seeded(&config).await;

    assert_eq!(
        first.list_customers().await.unwrap(),
        second.list_customers().await.unwrap()
    );
    assert_eq!(first.list_sales().await.unwrap(), second.list_sales().await.unwrap());
}

#[tokio::test]
async fn zero_sales_leaves_an_empty_sales_table() {
    let config = SeedConfig {
        customers: 5,
        sales: 0,
        ..SeedConfig::in_memory()
    };
    let (_, summary) = seeded(&config).await;
    assert_eq!(summary.report.sales, 0);
    assert_eq!(summary.report.revenue, Money::ZERO);
    assert_eq!(summary.report.discount_rate(), 0.0);
}
