use core::fmt;

use thiserror::Error;

use ultimosalto_core::DomainError;
use ultimosalto_infra::StoreError;

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Init,
    GenerateCustomers,
    LoadCatalog,
    GenerateSales,
    Validate,
    Close,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::Init,
        Stage::GenerateCustomers,
        Stage::LoadCatalog,
        Stage::GenerateSales,
        Stage::Validate,
        Stage::Close,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Stage::Init => "init",
            Stage::GenerateCustomers => "generate_customers",
            Stage::LoadCatalog => "load_catalog",
            Stage::GenerateSales => "generate_sales",
            Stage::Validate => "validate",
            Stage::Close => "close",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("stage {stage} failed: {source}")]
    Store {
        stage: Stage,
        #[source]
        source: StoreError,
    },

    #[error("stage {stage} produced invalid data: {source}")]
    Domain {
        stage: Stage,
        #[source]
        source: DomainError,
    },
}

impl SeedError {
    pub fn stage(&self) -> Stage {
        match self {
            SeedError::Store { stage, .. } | SeedError::Domain { stage, .. } => *stage,
        }
    }

    /// The database could not be opened at all, so nothing was written.
    pub fn is_connect_failure(&self) -> bool {
        matches!(
            self,
            SeedError::Store {
                stage: Stage::Init,
                source: StoreError::Connect { .. },
            }
        )
    }

    pub(crate) fn store(stage: Stage) -> impl FnOnce(StoreError) -> SeedError {
        move |source| SeedError::Store { stage, source }
    }

    pub(crate) fn domain(stage: Stage) -> impl FnOnce(DomainError) -> SeedError {
        move |source| SeedError::Domain { stage, source }
    }
}
