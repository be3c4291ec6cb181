use thiserror::Error;

/// Recurrence expansion errors
#[derive(Error, Debug)]
pub enum RecurError {
    #[error(transparent)]
    CoreError(#[from] koyomi_core::error::CoreError),
}

pub type RecurResult<T> = std::result::Result<T, RecurError>;
