//! Trend tests on groundwater level series.
//!
//! [`gwl_zyp_test`] runs Mann-Kendall tests with Sen's slope, after
//! removing serial correlation with the Yue-Pilon or Zhang method, on
//! monthly or annual summaries produced by `bcgw-data`.

pub mod error;
pub mod mann_kendall;
pub mod sen;
pub mod table;
pub mod zyp;

pub use error::{Result, TrendError};
pub use table::{gwl_trend_test, gwl_zyp_test, TrendCategory, TrendInput, TrendOptions, TrendResult};
pub use zyp::{TrendEstimate, TrendEstimator, TrendMethod, Zyp};
