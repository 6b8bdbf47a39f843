/// Error types for chart rendering
use plotters::drawing::DrawingAreaErrorKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChartError {
    /// Slope unit other than monthly or annual
    #[error("Invalid slope unit '{0}', expected monthly or annual")]
    InvalidUnit(String),

    /// Nothing to plot
    #[error("No records to plot")]
    EmptySeries,

    /// Backend failure while drawing
    #[error("Drawing failed: {0}")]
    Drawing(String),

    /// Chart export failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for ChartError {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        ChartError::Drawing(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ChartError>;
