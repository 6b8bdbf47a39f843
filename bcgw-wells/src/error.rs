/// Error types for observation well retrieval and formatting
use thiserror::Error;

/// Main error type for well operations
#[derive(Error, Debug)]
pub enum WellError {
    /// HTTP request failed
    #[cfg(feature = "api")]
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// Non-success status from the data catalogue
    #[error("Bad response status for {url}: {status}")]
    HttpStatus { url: String, status: u16 },

    /// Data catalogue returned nothing usable
    #[error("Empty response for {0}")]
    EmptyResponse(String),

    /// Failed to parse CSV data
    #[error("Failed to parse CSV: {0}")]
    CsvParse(#[from] csv::Error),

    /// Well identifiers are malformed or mix conventions
    #[error("Invalid well identifiers: {0}")]
    InvalidWells(String),

    /// Unknown data granularity selector
    #[error("Invalid data selector '{0}': expected one of all, recent, daily")]
    InvalidSelector(String),

    /// A required column is absent from a CSV table
    #[error("Missing column '{column}' in {table}")]
    MissingColumn { column: String, table: String },
}

/// Type alias for Results using WellError
pub type Result<T> = std::result::Result<T, WellError>;
