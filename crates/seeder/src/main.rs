use std::process::ExitCode;

use anyhow::Context;
use chrono::Local;

use ultimosalto_infra::SeedConfig;
use ultimosalto_seeder::{Progress, SeedError, Stage};

/// Prints a header before the generation and validation phases and one
/// check-marked line per finished stage.
struct Console;

impl Progress for Console {
    fn stage_started(&mut self, stage: Stage) {
        match stage {
            Stage::GenerateCustomers => println!("\n📊 Generando datos..."),
            Stage::Validate => println!("\n✅ Validando integridad..."),
            _ => {}
        }
    }

    fn stage_done(&mut self, stage: Stage, message: &str) {
        if stage != Stage::Validate {
            println!("✓ {message}");
        }
    }
}

async fn generate(config: &SeedConfig) -> anyhow::Result<()> {
    let today = Local::now().date_naive();
    tracing::info!(
        database = config.database_display(),
        customers = config.customers,
        sales = config.sales,
        seed = config.seed,
        %today,
        "seeding started"
    );

    let summary = ultimosalto_seeder::run(config, today, &mut Console)
        .await
        .context("seeding pipeline failed")?;

    println!("\n{}\n", summary.report);

    tracing::info!(
        customers = summary.customers,
        products = summary.products,
        sales = summary.sales,
        line_items = summary.line_items,
        "seeding finished"
    );
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    ultimosalto_observability::init();

    let config = SeedConfig::default();
    println!("\n🚀 Iniciando generación de base de datos...");
    println!("   Tienda de Deportes Extremos: El Último Salto\n");

    let Err(err) = generate(&config).await else {
        println!("✓ Base de datos guardada como: {}\n", config.database_display());
        return ExitCode::SUCCESS;
    };

    match err.downcast_ref::<SeedError>() {
        // Nothing was opened, so there is no database to report.
        Some(seed_err) if seed_err.is_connect_failure() => {
            eprintln!("✗ Error al conectar: {err:#}");
        }
        _ => {
            eprintln!("\n✗ Error durante la generación: {err:#}");
            println!("✓ Base de datos guardada como: {}\n", config.database_display());
        }
    }
    ExitCode::FAILURE
}
