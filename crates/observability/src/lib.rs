//! Process-wide tracing setup shared by the seeder binary and its tests.

/// Initialize process-wide tracing.
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    tracing::init(LogFormat::from_env());
}

pub mod tracing;

pub use crate::tracing::LogFormat;
