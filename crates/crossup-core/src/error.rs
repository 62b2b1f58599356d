//! Error types for crossup-core

use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("Division by zero")]
    DivisionByZero,
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
