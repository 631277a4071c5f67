use thiserror::Error;

/// Errors raised by the cart aggregate
#[derive(Debug, Error)]
pub enum CartError {
    #[error("Validation failed: {0}")]
    Validation(String),
}
