use thiserror::Error;

/// Crate-wide error taxonomy.
///
/// The first four variants are business-rule outcomes: expected, frequent,
/// and always returned as values. `Dependency` is reserved for failures
/// reported by a persistence backend that are unrelated to business rules.
#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("invalid status transition from '{from}' to '{to}'")]
    InvalidTransition { from: String, to: String },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("store error: {0}")]
    Dependency(String),
}

pub type Result<T> = std::result::Result<T, PaymentError>;
