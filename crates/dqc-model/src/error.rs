use thiserror::Error;

/// Errors surfaced by the compliance engine.
///
/// Only `Schema` conditions abort a run. Per-field mismatches, missing
/// fields, and rule violations are recorded as data in reports and
/// outcomes, never raised through this type.
#[derive(Debug, Error)]
pub enum DqcError {
    #[error("schema error: {message}")]
    Schema { message: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl DqcError {
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DqcError>;
