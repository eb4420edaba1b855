//! Shared Diesel error classification for the repositories.
//!
//! Each repository maps a [`DbFailure`] into its own port error, so the
//! constraint-specific variants (`SlotTaken`, `DuplicateName`, `InUse`) stay
//! local to the adapter that understands them.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Coarse outcome of a failed Diesel operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DbFailure {
    /// The connection dropped or could not be checked out.
    Connection(String),
    /// A unique index rejected the write.
    UniqueViolation { constraint: Option<String> },
    /// A foreign key rejected the write or delete.
    ForeignKeyViolation { constraint: Option<String> },
    /// Anything else.
    Query(String),
}

impl From<PoolError> for DbFailure {
    fn from(error: PoolError) -> Self {
        match error {
            PoolError::Checkout { message } | PoolError::Build { message } => {
                Self::Connection(message)
            }
        }
    }
}

impl From<DieselError> for DbFailure {
    fn from(error: DieselError) -> Self {
        match &error {
            DieselError::DatabaseError(kind, info) => {
                debug!(
                    ?kind,
                    message = info.message(),
                    constraint = info.constraint_name(),
                    "diesel operation failed"
                );
            }
            _ => debug!(
                error_type = %std::any::type_name_of_val(&error),
                "diesel operation failed"
            ),
        }

        match error {
            DieselError::NotFound => Self::Query("record not found".to_owned()),
            DieselError::QueryBuilderError(_) => Self::Query("database query error".to_owned()),
            DieselError::DatabaseError(kind, info) => {
                let constraint = info.constraint_name().map(str::to_owned);
                match kind {
                    DatabaseErrorKind::UniqueViolation => Self::UniqueViolation { constraint },
                    DatabaseErrorKind::ForeignKeyViolation => {
                        Self::ForeignKeyViolation { constraint }
                    }
                    DatabaseErrorKind::ClosedConnection => {
                        Self::Connection("database connection error".to_owned())
                    }
                    _ => Self::Query("database error".to_owned()),
                }
            }
            _ => Self::Query("database error".to_owned()),
        }
    }
}
