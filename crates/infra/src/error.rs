//! Storage error model.
//!
//! ## Error Mapping
//!
//! | SQLx error | `ErrorKind` | `StoreError` |
//! |------------|-------------|--------------|
//! | Database | `UniqueViolation` | `Constraint { kind: Unique }` |
//! | Database | `ForeignKeyViolation` | `Constraint { kind: ForeignKey }` |
//! | Database | `NotNullViolation` | `Constraint { kind: NotNull }` |
//! | Database | `CheckViolation` | `Constraint { kind: Check }` |
//! | anything else | | `Database` |
//!
//! Connection setup failures are reported as `Connect` by the store itself.

use sqlx::error::ErrorKind;
use thiserror::Error;

use ultimosalto_core::DomainError;

/// Which declared constraint rejected a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Unique,
    ForeignKey,
    NotNull,
    Check,
}

impl core::fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            ConstraintKind::Unique => "unique",
            ConstraintKind::ForeignKey => "foreign key",
            ConstraintKind::NotNull => "not null",
            ConstraintKind::Check => "check",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to open database {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("{kind} constraint violated in {operation}: {message}")]
    Constraint {
        operation: &'static str,
        kind: ConstraintKind,
        message: String,
    },

    #[error("database error in {operation}: {source}")]
    Database {
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("invalid stored row in {operation}: {source}")]
    Domain {
        operation: &'static str,
        #[source]
        source: DomainError,
    },
}

impl StoreError {
    pub(crate) fn domain(operation: &'static str) -> impl FnOnce(DomainError) -> StoreError {
        move |source| StoreError::Domain { operation, source }
    }

    pub fn is_constraint(&self, kind: ConstraintKind) -> bool {
        matches!(self, StoreError::Constraint { kind: k, .. } if *k == kind)
    }
}

/// Map SQLx errors to `StoreError`, tagging the failing operation.
pub(crate) fn map_sqlx_error(operation: &'static str, err: sqlx::Error) -> StoreError {
    let kind = match &err {
        sqlx::Error::Database(db_err) => match db_err.kind() {
            ErrorKind::UniqueViolation => Some(ConstraintKind::Unique),
            ErrorKind::ForeignKeyViolation => Some(ConstraintKind::ForeignKey),
            ErrorKind::NotNullViolation => Some(ConstraintKind::NotNull),
            ErrorKind::CheckViolation => Some(ConstraintKind::Check),
            _ => None,
        },
        _ => None,
    };

    match (kind, err) {
        (Some(kind), sqlx::Error::Database(db_err)) => StoreError::Constraint {
            operation,
            kind,
            message: db_err.message().to_string(),
        },
        (_, source) => StoreError::Database { operation, source },
    }
}

/// Shorthand used by every query in the store.
pub(crate) fn sqlx_err(operation: &'static str) -> impl FnOnce(sqlx::Error) -> StoreError {
    move |err| map_sqlx_error(operation, err)
}
