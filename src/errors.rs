use sea_orm::error::DbErr;
use thiserror::Error;

/// A single component that could not be moved during a cascading
/// location update, with the storage-level reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadeFailure {
    pub serial: String,
    pub reason: String,
}

impl std::fmt::Display for CascadeFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.serial, self.reason)
    }
}

/// Error taxonomy for inventory operations.
///
/// Every error resolves at the boundary of a single user operation: the
/// operation is not committed, prior state remains authoritative, and
/// nothing is retried automatically.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// Any failure at the persistence boundary. Surfaced verbatim.
    #[error("Database error: {0}")]
    DatabaseError(#[from] DbErr),

    #[error("Duplicate serial number: {0}")]
    DuplicateSerial(String),

    #[error("Duplicate name: {0}")]
    DuplicateName(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    /// A referenced device friendly name no longer maps to any serial.
    #[error("Resolution error: {0}")]
    ResolutionError(String),

    /// One or more connected components failed during a cascading
    /// location update. The whole operation is rolled back; the failures
    /// are reported per component, never as a blanket success.
    #[error("Cascade failed for {} component(s) connected to {device_serial}", failures.len())]
    PartialCascadeFailure {
        device_serial: String,
        failures: Vec<CascadeFailure>,
    },

    #[error("Event error: {0}")]
    EventError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl InventoryError {
    /// Wraps a database error, keeping the helper signature services and
    /// queries use when `?` conversion is not available.
    pub fn db_error(err: DbErr) -> Self {
        InventoryError::DatabaseError(err)
    }
}
