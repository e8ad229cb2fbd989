//! Seeding configuration.
//!
//! Every tunable of a run is a fixed constant; nothing is read from the
//! environment or the command line. Tests build their own `SeedConfig`.

use chrono::NaiveDate;

const fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => date,
        None => panic!("invalid calendar date"),
    }
}

pub const DEFAULT_DATABASE_URL: &str = "sqlite://tienda.db";
pub const DEFAULT_CUSTOMERS: usize = 250;
pub const DEFAULT_SALES: usize = 1250;
pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_WINDOW_START: NaiveDate = ymd(2024, 1, 1);
pub const DEFAULT_WINDOW_END: NaiveDate = ymd(2025, 12, 31);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedConfig {
    /// SQLite connection URL (`sqlite://path` or `sqlite::memory:`).
    pub database_url: String,
    pub customers: usize,
    pub sales: usize,
    /// Seed shared by every generation phase (each phase re-seeds with it).
    pub seed: u64,
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            customers: DEFAULT_CUSTOMERS,
            sales: DEFAULT_SALES,
            seed: DEFAULT_SEED,
            window_start: DEFAULT_WINDOW_START,
            window_end: DEFAULT_WINDOW_END,
        }
    }
}

impl SeedConfig {
    /// Same tunables, in-memory database. Handy for tests and dry runs.
    pub fn in_memory() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            ..Self::default()
        }
    }

    /// Human-readable location of the database (path without the scheme).
    pub fn database_display(&self) -> &str {
        self.database_url
            .strip_prefix("sqlite://")
            .or_else(|| self.database_url.strip_prefix("sqlite:"))
            .unwrap_or(&self.database_url)
    }
}
