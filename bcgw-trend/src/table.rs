use crate::error::{Result, TrendError};
use crate::zyp::{TrendEstimate, TrendEstimator, TrendMethod, Zyp};
use bcgw_data::{AnnualRecord, MonthlyRecord};
use bcgw_utils::dates::month_index;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rows a trend test can run on: monthly or annual summaries.
pub trait TrendInput {
    fn well_num(&self) -> u32;

    /// Position on the time axis, one unit per period.
    fn period(&self) -> i32;

    /// Value in a named column. `None` when the column does not exist,
    /// `Some(None)` for a missing value.
    fn column(&self, name: &str) -> Option<Option<f64>>;

    /// Columns accepted by [`TrendInput::column`].
    fn columns() -> &'static [&'static str];
}

impl TrendInput for MonthlyRecord {
    fn well_num(&self) -> u32 {
        self.well_num
    }

    fn period(&self) -> i32 {
        month_index(self.year, self.month)
    }

    fn column(&self, name: &str) -> Option<Option<f64>> {
        match name.to_ascii_lowercase().as_str() {
            "med_gwl" => Some(Some(self.med_gwl)),
            "dev_med_gwl" => Some(self.dev_med_gwl),
            _ => None,
        }
    }

    fn columns() -> &'static [&'static str] {
        &["med_GWL", "dev_med_GWL"]
    }
}

impl TrendInput for AnnualRecord {
    fn well_num(&self) -> u32 {
        self.well_num
    }

    fn period(&self) -> i32 {
        self.year
    }

    fn column(&self, name: &str) -> Option<Option<f64>> {
        match name.to_ascii_lowercase().as_str() {
            "mean_gwl" => Some(Some(self.mean_gwl)),
            "med_gwl" => Some(Some(self.med_gwl)),
            "sd_gwl" => Some(self.sd_gwl),
            "q95_gwl" => Some(Some(self.q95_gwl)),
            _ => None,
        }
    }

    fn columns() -> &'static [&'static str] {
        &["mean_GWL", "med_GWL", "sd_GWL", "q95_GWL"]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendOptions {
    /// Methods run for every series, in output order.
    pub methods: Vec<TrendMethod>,
    /// Series with fewer non-missing values get empty results.
    pub min_periods: usize,
}

impl Default for TrendOptions {
    fn default() -> Self {
        TrendOptions {
            methods: TrendMethod::ALL.to_vec(),
            min_periods: 4,
        }
    }
}

/// One row of trend output: a well (or the whole table) under one method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendResult {
    #[serde(rename = "Well_Num")]
    pub well_num: Option<u32>,
    pub test_type: TrendMethod,
    pub lbound: Option<f64>,
    pub trend: Option<f64>,
    pub trendp: Option<f64>,
    pub ubound: Option<f64>,
    pub tau: Option<f64>,
    pub sig: Option<f64>,
    pub nruns: Option<f64>,
    pub autocor: Option<f64>,
    pub valid_frac: Option<f64>,
    pub linear: Option<f64>,
    pub intercept: Option<f64>,
}

impl TrendResult {
    fn new(well_num: Option<u32>, test_type: TrendMethod, estimate: TrendEstimate) -> Self {
        TrendResult {
            well_num,
            test_type,
            lbound: estimate.lbound,
            trend: estimate.trend,
            trendp: estimate.trendp,
            ubound: estimate.ubound,
            tau: estimate.tau,
            sig: estimate.sig,
            nruns: estimate.nruns,
            autocor: estimate.autocor,
            valid_frac: estimate.valid_frac,
            linear: estimate.linear,
            intercept: estimate.intercept,
        }
    }

    pub fn category(&self, alpha: f64) -> TrendCategory {
        TrendCategory::classify(self.trend, self.sig, alpha)
    }
}

/// Direction of a groundwater trend. Levels are depths below ground, so a
/// positive slope is a declining water table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendCategory {
    Stable,
    Declining,
    Increasing,
}

impl TrendCategory {
    pub fn classify(trend: Option<f64>, sig: Option<f64>, alpha: f64) -> TrendCategory {
        match (trend, sig) {
            (Some(trend), Some(sig)) if sig < alpha && trend > 0.0 => TrendCategory::Declining,
            (Some(trend), Some(sig)) if sig < alpha && trend < 0.0 => TrendCategory::Increasing,
            _ => TrendCategory::Stable,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TrendCategory::Stable => "stable",
            TrendCategory::Declining => "declining",
            TrendCategory::Increasing => "increasing",
        }
    }
}

impl fmt::Display for TrendCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn check_column<R: TrendInput>(col: &str) -> Result<()> {
    if R::columns().iter().any(|c| c.eq_ignore_ascii_case(col)) {
        Ok(())
    } else {
        Err(TrendError::UnknownColumn {
            column: col.to_string(),
            expected: R::columns().join(", "),
        })
    }
}

/// Trend test on column `col` with the built-in estimators.
///
/// With `by_id` each well is tested separately, wells in first-appearance
/// order; otherwise the whole table is one series and `well_num` is `None`.
/// Every series yields one row per method in `options.methods`.
pub fn gwl_zyp_test<R: TrendInput>(
    rows: &[R],
    col: &str,
    by_id: bool,
    options: &TrendOptions,
) -> Result<Vec<TrendResult>> {
    gwl_trend_test(&Zyp, rows, col, by_id, options)
}

/// As [`gwl_zyp_test`], with a caller-supplied estimator.
pub fn gwl_trend_test<E: TrendEstimator, R: TrendInput>(
    estimator: &E,
    rows: &[R],
    col: &str,
    by_id: bool,
    options: &TrendOptions,
) -> Result<Vec<TrendResult>> {
    check_column::<R>(col)?;
    let groups: Vec<(Option<u32>, Vec<&R>)> = if by_id {
        let mut groups: Vec<(Option<u32>, Vec<&R>)> = Vec::new();
        for row in rows {
            let well = Some(row.well_num());
            match groups.iter_mut().find(|(id, _)| *id == well) {
                Some((_, group)) => group.push(row),
                None => groups.push((well, vec![row])),
            }
        }
        groups
    } else {
        vec![(None, rows.iter().collect())]
    };

    let mut results = Vec::new();
    for (well_num, mut group) in groups {
        group.sort_by_key(|row| row.period());
        let first = group.first().map_or(0, |row| row.period());
        let times: Vec<f64> = group.iter().map(|row| (row.period() - first) as f64).collect();
        let values: Vec<Option<f64>> = group
            .iter()
            .map(|row| row.column(col).flatten().filter(|v| v.is_finite()))
            .collect();
        let n_valid = values.iter().flatten().count();
        if n_valid < options.min_periods {
            info!(
                "Skipping trend for well {:?}: {} values, need {}",
                well_num, n_valid, options.min_periods
            );
            results.extend(options.methods.iter().map(|&method| {
                TrendResult::new(well_num, method, TrendEstimate::default())
            }));
            continue;
        }
        for &method in &options.methods {
            let estimate = estimator.estimate(&times, &values, method);
            debug!(
                "well {:?} {}: trend {:?} sig {:?}",
                well_num, method, estimate.trend, estimate.sig
            );
            results.push(TrendResult::new(well_num, method, estimate));
        }
    }
    Ok(results)
}
