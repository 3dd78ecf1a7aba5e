//! Domain error types.
//!
//! These errors represent validation failures on user-supplied values
//! (form fields, persisted slots). They are distinct from API/IO errors.

/// Domain-level errors for parsing and validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Service type code not in the catalogue
    #[error("unknown service type: {0}")]
    UnknownServiceType(String),

    /// Column id not in the fixed column set
    #[error("unknown column: {0}")]
    UnknownColumn(String),

    /// Date is not in YYYY-MM-DD format
    #[error("invalid date: {0}")]
    InvalidDate(String),
}
