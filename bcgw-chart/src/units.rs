use crate::error::ChartError;
use std::fmt;
use std::str::FromStr;

pub const DAYS_PER_YEAR: f64 = 365.0;

/// Time unit of a trend slope as produced by the trend test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlopeUnit {
    Monthly,
    #[default]
    Annual,
}

impl SlopeUnit {
    /// Slope per day, for drawing against a date axis.
    pub fn per_day(&self, slope: f64) -> f64 {
        match self {
            SlopeUnit::Monthly => slope / (12.0 * DAYS_PER_YEAR),
            SlopeUnit::Annual => slope / DAYS_PER_YEAR,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SlopeUnit::Monthly => "monthly",
            SlopeUnit::Annual => "annual",
        }
    }
}

/// Per-day slope expressed per year, for display.
pub fn per_year(slope_per_day: f64) -> f64 {
    slope_per_day * DAYS_PER_YEAR
}

impl FromStr for SlopeUnit {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monthly" => Ok(SlopeUnit::Monthly),
            "annual" => Ok(SlopeUnit::Annual),
            _ => Err(ChartError::InvalidUnit(s.to_string())),
        }
    }
}

impl fmt::Display for SlopeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn is_stable(category: &str) -> bool {
    category.trim().eq_ignore_ascii_case("stable")
}
