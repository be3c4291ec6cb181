use thiserror::Error;

/// Core-level errors
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid window: {0}")]
    InvalidWindow(String),

    #[error("Invalid working hours: {0}")]
    InvalidWorkingHours(String),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
