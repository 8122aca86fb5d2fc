use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgendaError {
    #[error("You can only book appointments with providers")]
    InvalidProvider,

    #[error("Past dates are not permitted")]
    PastDate,

    #[error("Appointment slot is not available")]
    SlotUnavailable,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

pub type AgendaResult<T> = Result<T, AgendaError>;
