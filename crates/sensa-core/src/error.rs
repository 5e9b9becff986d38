//! Error types for Sensa

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("operation already registered: {0}")]
    DuplicateOperation(String),

    #[error("operation capacity reached: {capacity} operations registered")]
    OperationCapacity { capacity: usize },

    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
