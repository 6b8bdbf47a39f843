//! Prewhitened Mann-Kendall trend estimates.
//!
//! Serial correlation inflates the significance of a plain Mann-Kendall
//! test, so both methods remove lag-1 autocorrelation before testing:
//!
//! * Yue-Pilon detrends with Sen's slope, prewhitens the residuals once and
//!   adds the trend back before testing.
//! * Zhang prewhitens the raw series and re-estimates slope and
//!   autocorrelation until both settle.

use crate::error::TrendError;
use crate::mann_kendall::mann_kendall;
use crate::sen::{
    confidence_bounds, lag1_autocorrelation, linear_slope, pairwise_slopes, sen_intercept,
    sen_slope,
};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Autocorrelation below this is not removed by the Zhang method.
pub const ZHANG_MIN_AUTOCOR: f64 = 0.05;
pub const ZHANG_MAX_ITERATIONS: u32 = 500;
const ZHANG_SLOPE_TOLERANCE: f64 = 0.01;
const ZHANG_AUTOCOR_TOLERANCE: f64 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendMethod {
    YuePilon,
    Zhang,
}

impl TrendMethod {
    pub const ALL: [TrendMethod; 2] = [TrendMethod::YuePilon, TrendMethod::Zhang];

    pub fn as_str(&self) -> &'static str {
        match self {
            TrendMethod::YuePilon => "yuepilon",
            TrendMethod::Zhang => "zhang",
        }
    }
}

impl fmt::Display for TrendMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrendMethod {
    type Err = TrendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yuepilon" | "yue-pilon" => Ok(TrendMethod::YuePilon),
            "zhang" => Ok(TrendMethod::Zhang),
            _ => Err(TrendError::UnknownMethod(s.to_string())),
        }
    }
}

/// Statistics produced for one series by one method.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrendEstimate {
    pub lbound: Option<f64>,
    /// Slope per time step.
    pub trend: Option<f64>,
    /// Slope times the series length.
    pub trendp: Option<f64>,
    pub ubound: Option<f64>,
    pub tau: Option<f64>,
    /// Two-sided p-value.
    pub sig: Option<f64>,
    pub nruns: Option<f64>,
    pub autocor: Option<f64>,
    pub valid_frac: Option<f64>,
    pub linear: Option<f64>,
    pub intercept: Option<f64>,
}

/// A trend test applied to a series on a regular time axis.
///
/// `values[i]` is observed at `times[i]`; `None` marks a missing value.
pub trait TrendEstimator {
    fn estimate(&self, times: &[f64], values: &[Option<f64>], method: TrendMethod)
        -> TrendEstimate;
}

/// Built-in Yue-Pilon and Zhang estimators.
#[derive(Debug, Clone, Copy, Default)]
pub struct Zyp;

/// Prewhiten `values` with lag-1 coefficient `c`, dropping the first point.
fn prewhiten(times: &[f64], values: &[f64], c: f64, rescale: bool) -> (Vec<f64>, Vec<f64>) {
    let scale = if rescale { 1.0 - c } else { 1.0 };
    let whitened = values
        .windows(2)
        .map(|w| (w[1] - c * w[0]) / scale)
        .collect();
    (times[1..].to_vec(), whitened)
}

struct Prewhitened {
    slope: f64,
    times: Vec<f64>,
    values: Vec<f64>,
    autocor: f64,
    nruns: u32,
}

fn yue_pilon(times: &[f64], values: &[f64]) -> Option<Prewhitened> {
    let slope = sen_slope(times, values)?;
    let detrended: Vec<f64> = times
        .iter()
        .zip(values)
        .map(|(t, y)| y - slope * t)
        .collect();
    let autocor = lag1_autocorrelation(&detrended);
    let (times, residuals) = prewhiten(times, &detrended, autocor, false);
    let values = times
        .iter()
        .zip(residuals)
        .map(|(t, r)| r + slope * t)
        .collect();
    Some(Prewhitened {
        slope,
        times,
        values,
        autocor,
        nruns: 1,
    })
}

fn zhang(times: &[f64], values: &[f64]) -> Option<Prewhitened> {
    let mut autocor = lag1_autocorrelation(values).min(0.99);
    if autocor < ZHANG_MIN_AUTOCOR {
        return Some(Prewhitened {
            slope: sen_slope(times, values)?,
            times: times.to_vec(),
            values: values.to_vec(),
            autocor,
            nruns: 1,
        });
    }
    let (mut w_times, mut w_values) = prewhiten(times, values, autocor, true);
    let mut slope = sen_slope(&w_times, &w_values)?;
    let mut nruns = 1;
    while nruns < ZHANG_MAX_ITERATIONS {
        let detrended: Vec<f64> = times
            .iter()
            .zip(values)
            .map(|(t, y)| y - slope * t)
            .collect();
        let next_autocor = lag1_autocorrelation(&detrended).min(0.99);
        let (next_times, next_values) = if next_autocor < ZHANG_MIN_AUTOCOR {
            (times.to_vec(), values.to_vec())
        } else {
            prewhiten(times, values, next_autocor, true)
        };
        let next_slope = sen_slope(&next_times, &next_values)?;
        nruns += 1;
        let settled = (next_autocor - autocor).abs() <= ZHANG_AUTOCOR_TOLERANCE
            && (next_slope - slope).abs() <= ZHANG_SLOPE_TOLERANCE * slope.abs();
        autocor = next_autocor;
        slope = next_slope;
        w_times = next_times;
        w_values = next_values;
        if settled || autocor < ZHANG_MIN_AUTOCOR {
            break;
        }
    }
    debug!("zhang: {} iterations, autocorrelation {:.4}", nruns, autocor);
    Some(Prewhitened {
        slope,
        times: w_times,
        values: w_values,
        autocor,
        nruns,
    })
}

impl TrendEstimator for Zyp {
    fn estimate(
        &self,
        times: &[f64],
        values: &[Option<f64>],
        method: TrendMethod,
    ) -> TrendEstimate {
        let (t, y): (Vec<f64>, Vec<f64>) = times
            .iter()
            .zip(values)
            .filter_map(|(t, v)| v.map(|v| (*t, v)))
            .unzip();
        let valid_frac = (!values.is_empty()).then(|| t.len() as f64 / values.len() as f64);
        let linear = linear_slope(&t, &y);
        if t.len() < 3 {
            return TrendEstimate {
                valid_frac,
                linear,
                ..TrendEstimate::default()
            };
        }
        let prewhitened = match method {
            TrendMethod::YuePilon => yue_pilon(&t, &y),
            TrendMethod::Zhang => zhang(&t, &y),
        };
        let Some(pw) = prewhitened else {
            return TrendEstimate {
                valid_frac,
                linear,
                ..TrendEstimate::default()
            };
        };
        let mk = mann_kendall(&pw.values);
        let bounds = mk.and_then(|mk| {
            confidence_bounds(&pairwise_slopes(&pw.times, &pw.values), mk.var_s)
        });
        TrendEstimate {
            lbound: bounds.map(|(low, _)| low),
            trend: Some(pw.slope),
            trendp: Some(pw.slope * values.len() as f64),
            ubound: bounds.map(|(_, high)| high),
            tau: mk.and_then(|mk| mk.tau),
            sig: mk.map(|mk| mk.sig),
            nruns: Some(pw.nruns as f64),
            autocor: Some(pw.autocor),
            valid_frac,
            linear,
            intercept: sen_intercept(&t, &y, pw.slope),
        }
    }
}
