/// Error types for trend testing
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrendError {
    /// Requested value column does not exist on the input rows
    #[error("Unknown column '{column}', expected one of: {expected}")]
    UnknownColumn { column: String, expected: String },

    /// Unknown trend method name
    #[error("Unknown trend method '{0}', expected yuepilon or zhang")]
    UnknownMethod(String),
}

pub type Result<T> = std::result::Result<T, TrendError>;
