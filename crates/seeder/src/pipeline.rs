use chrono::NaiveDate;
use tracing::{Instrument, info_span};

use ultimosalto_core::seeded_rng;
use ultimosalto_infra::{SeedConfig, SqliteStore, ValidationReport};
use ultimosalto_parties::{AgePolicy, CustomerGenerator, FakeIdentityProvider};
use ultimosalto_products::catalog;
use ultimosalto_sales::{CouponPolicy, SaleWindow, SalesGenerator};

use crate::error::{SeedError, Stage};

/// Observes the pipeline: a call before each stage runs and a short message
/// after it completes.
pub trait Progress {
    fn stage_started(&mut self, _stage: Stage) {}

    fn stage_done(&mut self, stage: Stage, message: &str);
}

/// Silent progress.
impl Progress for () {
    fn stage_done(&mut self, _stage: Stage, _message: &str) {}
}

/// What a successful run wrote, plus the validation report.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedSummary {
    pub customers: u64,
    pub products: u64,
    pub sales: usize,
    pub line_items: usize,
    pub report: ValidationReport,
}

/// Open `config.database_url`, seed it, and always close the connection.
///
/// A stage failure is returned even if closing afterwards also fails; the
/// close error is then only logged.
pub async fn run<P: Progress + ?Sized>(
    config: &SeedConfig,
    today: NaiveDate,
    progress: &mut P,
) -> Result<SeedSummary, SeedError> {
    progress.stage_started(Stage::Init);
    let mut store = SqliteStore::connect(&config.database_url)
        .await
        .map_err(SeedError::store(Stage::Init))?;
    progress.stage_done(
        Stage::Init,
        &format!("Conexión a {} establecida", config.database_display()),
    );

    let outcome = seed(&mut store, config, today, progress).await;
    let closed = store
        .close()
        .instrument(info_span!("stage", name = %Stage::Close))
        .await
        .map_err(SeedError::store(Stage::Close));

    match (outcome, closed) {
        (Ok(summary), Ok(())) => Ok(summary),
        (Ok(_), Err(err)) => Err(err),
        (Err(err), Ok(())) => Err(err),
        (Err(err), Err(close_err)) => {
            tracing::warn!(error = %close_err, "closing after a failed run also failed");
            Err(err)
        }
    }
}

/// Run every generation stage against an open store.
///
/// Customers, identities and sales each draw from their own generator seeded
/// with `config.seed`, so the customer population depends only on the seed
/// and `today`.
pub async fn seed<P: Progress + ?Sized>(
    store: &mut SqliteStore,
    config: &SeedConfig,
    today: NaiveDate,
    progress: &mut P,
) -> Result<SeedSummary, SeedError> {
    progress.stage_started(Stage::Init);
    store
        .init_schema()
        .instrument(info_span!("stage", name = %Stage::Init))
        .await
        .map_err(SeedError::store(Stage::Init))?;
    progress.stage_done(Stage::Init, "Tablas creadas exitosamente");

    progress.stage_started(Stage::GenerateCustomers);
    let customers = seed_customers(store, config, today)
        .instrument(info_span!("stage", name = %Stage::GenerateCustomers))
        .await?;
    progress.stage_done(
        Stage::GenerateCustomers,
        &format!("{customers} clientes insertados"),
    );

    progress.stage_started(Stage::LoadCatalog);
    let products = load_catalog(store)
        .instrument(info_span!("stage", name = %Stage::LoadCatalog))
        .await?;
    progress.stage_done(Stage::LoadCatalog, &format!("{products} productos insertados"));

    progress.stage_started(Stage::GenerateSales);
    let (sales, line_items) = seed_sales(store, config, today)
        .instrument(info_span!("stage", name = %Stage::GenerateSales))
        .await?;
    progress.stage_done(Stage::GenerateSales, &format!("{sales} ventas generadas"));

    progress.stage_started(Stage::Validate);
    let report = validate(store, today)
        .instrument(info_span!("stage", name = %Stage::Validate))
        .await?;
    progress.stage_done(Stage::Validate, "Validación completada");

    Ok(SeedSummary {
        customers,
        products,
        sales,
        line_items,
        report,
    })
}

async fn seed_customers(
    store: &mut SqliteStore,
    config: &SeedConfig,
    today: NaiveDate,
) -> Result<u64, SeedError> {
    const STAGE: Stage = Stage::GenerateCustomers;

    let generator =
        CustomerGenerator::new(AgePolicy::default(), today).map_err(SeedError::domain(STAGE))?;
    let mut rng = seeded_rng(config.seed);
    let mut identities = FakeIdentityProvider::new(config.seed);

    let customers = generator
        .generate(config.customers, &mut rng, &mut identities)
        .map_err(SeedError::domain(STAGE))?;
    tracing::debug!(count = customers.len(), "customers generated");

    store
        .insert_customers(&customers)
        .await
        .map_err(SeedError::store(STAGE))
}

async fn load_catalog(store: &mut SqliteStore) -> Result<u64, SeedError> {
    const STAGE: Stage = Stage::LoadCatalog;

    let products = catalog().map_err(SeedError::domain(STAGE))?;
    store
        .insert_products(&products)
        .await
        .map_err(SeedError::store(STAGE))
}

async fn seed_sales(
    store: &mut SqliteStore,
    config: &SeedConfig,
    today: NaiveDate,
) -> Result<(usize, usize), SeedError> {
    const STAGE: Stage = Stage::GenerateSales;

    let customers = store.list_customers().await.map_err(SeedError::store(STAGE))?;
    let products = store.list_products().await.map_err(SeedError::store(STAGE))?;

    let window =
        SaleWindow::new(config.window_start, config.window_end).map_err(SeedError::domain(STAGE))?;
    let generator = SalesGenerator::new(window, CouponPolicy::default(), today)
        .map_err(SeedError::domain(STAGE))?;
    let mut rng = seeded_rng(config.seed);

    let sales = generator
        .generate(config.sales, &customers, &products, &mut rng)
        .map_err(SeedError::domain(STAGE))?;
    let line_items: usize = sales.iter().map(|s| s.lines().len()).sum();
    let coupons = sales.iter().filter(|s| s.coupon().is_some()).count();
    tracing::debug!(count = sales.len(), line_items, coupons, "sales generated");

    let ids = store
        .insert_sales(&sales)
        .await
        .map_err(SeedError::store(STAGE))?;
    Ok((ids.len(), line_items))
}

async fn validate(store: &mut SqliteStore, today: NaiveDate) -> Result<ValidationReport, SeedError> {
    let report = store
        .collect_report(today)
        .await
        .map_err(SeedError::store(Stage::Validate))?;

    match serde_json::to_string(&report) {
        Ok(json) => tracing::info!(report = %json, "validation report"),
        Err(err) => tracing::warn!(error = %err, "validation report could not be serialized"),
    }
    Ok(report)
}
