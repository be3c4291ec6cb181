use thiserror::Error;

/// Layout and mapping errors
#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("Invalid mapper configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    CoreError(#[from] koyomi_core::error::CoreError),
}

pub type LayoutResult<T> = std::result::Result<T, LayoutError>;
