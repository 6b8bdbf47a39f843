//! Data processing for groundwater level observations.
//!
//! This crate turns the canonical observation table into monthly and annual
//! series: monthly medians, gap-filled contiguous monthly series with
//! optional edge trimming, and annual summaries suitable for trend tests.

pub mod annual;
pub mod gap_fill;
pub mod interpolation;
pub mod monthly;
pub mod trim;
pub mod year_month;

pub use annual::{annual_values, AnnualRecord};
pub use gap_fill::make_well_ts;
pub use monthly::{monthly_values, MonthlyRecord};
pub use trim::TrimOptions;
