//! The whole pipeline: fetch, summarize, test for trends and chart each well.

use crate::fetch::fetch_observations;
use crate::monthly::monthly_table;
use crate::table::write_table;
use bcgw_chart::{gwl_area_plot, gwl_monthly_plot, AreaPlotParams, SlopeUnit};
use bcgw_data::{annual_values, MonthlyRecord};
use bcgw_trend::{gwl_zyp_test, TrendCategory, TrendMethod, TrendOptions, TrendResult};
use bcgw_wells::{fetch::FetchOptions, observation::Observation, well::WellId};
use log::{info, warn};
use serde::Serialize;
use std::path::Path;

/// Significance level used to categorise trends.
pub const ALPHA: f64 = 0.05;

/// Row counts of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisSummary {
    pub wells: usize,
    pub observations: usize,
    pub monthly: usize,
    pub annual: usize,
    pub trends: usize,
    pub charts: usize,
}

/// Chart parameters from a well's Yue-Pilon result on annual means.
pub fn area_params(result: Option<&TrendResult>) -> AreaPlotParams {
    let Some(result) = result else {
        return AreaPlotParams::default();
    };
    AreaPlotParams {
        trend: result.trend,
        intercept: result.intercept,
        trend_category: result.category(ALPHA).to_string(),
        sig: result.sig,
        unit: SlopeUnit::Annual,
        ..AreaPlotParams::default()
    }
}

fn well_code(well_num: u32) -> String {
    WellId::new(well_num)
        .map(|well| well.code())
        .unwrap_or_else(|_| format!("well{}", well_num))
}

/// Summarize, test and chart an observation table, writing into `out_dir`.
pub fn analyze_observations(
    observations: &[Observation],
    out_dir: &Path,
) -> anyhow::Result<AnalysisSummary> {
    std::fs::create_dir_all(out_dir)?;
    write_table(out_dir.join("observations.csv"), observations)?;

    let monthly = monthly_table(observations, true, true);
    write_table(out_dir.join("monthly.csv"), &monthly)?;
    let annual = annual_values(&monthly);
    write_table(out_dir.join("annual.csv"), &annual)?;
    let trends = gwl_zyp_test(&annual, "mean_GWL", true, &TrendOptions::default())?;
    write_table(out_dir.join("trends.csv"), &trends)?;

    let groups = MonthlyRecord::group_by_well(&monthly);
    let mut charts = 0;
    for (well_num, group) in &groups {
        let records: Vec<MonthlyRecord> = group.iter().map(|&record| record.clone()).collect();
        let result = trends
            .iter()
            .find(|t| t.well_num == Some(*well_num) && t.test_type == TrendMethod::YuePilon);
        let params = area_params(result);
        let code = well_code(*well_num);
        if params.trend_category != TrendCategory::Stable.as_str() {
            info!("{}: {} ({:?})", code, params.trend_category, params.sig);
        }
        match gwl_area_plot(&records, &params) {
            Ok(chart) => {
                chart.save(out_dir.join(format!("{}-area.svg", code)))?;
                charts += 1;
            }
            Err(e) => warn!("Skipping area chart for {}: {}", code, e),
        }
        match gwl_monthly_plot(&records, true) {
            Ok(chart) => {
                chart.save(out_dir.join(format!("{}-seasonal.svg", code)))?;
                charts += 1;
            }
            Err(e) => warn!("Skipping seasonal chart for {}: {}", code, e),
        }
    }

    let summary = AnalysisSummary {
        wells: groups.len(),
        observations: observations.len(),
        monthly: monthly.len(),
        annual: annual.len(),
        trends: trends.len(),
        charts,
    };
    std::fs::write(
        out_dir.join("summary.json"),
        serde_json::to_string_pretty(&summary)?,
    )?;
    Ok(summary)
}

pub async fn run_analyze(
    wells: &[String],
    options: &FetchOptions,
    out_dir: &str,
) -> anyhow::Result<()> {
    let observations = fetch_observations(wells, options).await?;
    let summary = analyze_observations(&observations, Path::new(out_dir))?;
    info!(
        "Analyzed {} wells: {} observations, {} months, {} years, {} trend rows, {} charts in {}",
        summary.wells,
        summary.observations,
        summary.monthly,
        summary.annual,
        summary.trends,
        summary.charts,
        out_dir
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::read_table;
    use chrono::NaiveDate;

    fn observations() -> Vec<Observation> {
        let mut observations = Vec::new();
        for (well_num, slope) in [(309, 0.3), (2, -0.2)] {
            for year in 2012..2020 {
                for month in 1..=12u32 {
                    // one month with no readings per well
                    if (year, month) == (2015, 6) {
                        continue;
                    }
                    let level = 10.0 + slope * (year - 2012) as f64 + 0.05 * month as f64;
                    for day in [3, 17] {
                        observations.push(Observation {
                            well_num,
                            ems_id: Some(format!("E{}", well_num)),
                            station_name: None,
                            date: NaiveDate::from_ymd_opt(year, month, day).unwrap(),
                            gwl: level + day as f64 / 1000.0,
                            historical_mean: Some(10.0),
                            historical_min: Some(8.0),
                            historical_max: Some(12.0),
                            status: String::from("Validated"),
                        });
                    }
                }
            }
        }
        observations
    }

    #[test]
    fn test_analyze_writes_tables_and_charts() {
        let dir = tempfile::tempdir().unwrap();
        let summary = analyze_observations(&observations(), dir.path()).unwrap();
        assert_eq!(summary.wells, 2);
        assert_eq!(summary.monthly, 2 * 96);
        assert_eq!(summary.annual, 2 * 8);
        assert_eq!(summary.trends, 4);
        assert_eq!(summary.charts, 4);
        for file in [
            "observations.csv",
            "monthly.csv",
            "annual.csv",
            "trends.csv",
            "OW309-area.svg",
            "OW309-seasonal.svg",
            "OW002-area.svg",
            "OW002-seasonal.svg",
            "summary.json",
        ] {
            assert!(dir.path().join(file).exists(), "{file}");
        }
        let trends: Vec<TrendResult> = read_table(dir.path().join("trends.csv")).unwrap();
        assert_eq!(trends[0].well_num, Some(309));
        assert_eq!(trends[0].category(ALPHA), TrendCategory::Declining);
        assert_eq!(trends[2].well_num, Some(2));
        assert_eq!(trends[2].category(ALPHA), TrendCategory::Increasing);
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(dir.path().join("summary.json")).unwrap())
                .unwrap();
        assert_eq!(json["trends"], 4);
        let monthly: Vec<MonthlyRecord> = read_table(dir.path().join("monthly.csv")).unwrap();
        assert_eq!(monthly.iter().filter(|r| r.is_interpolated()).count(), 2);
    }

    #[test]
    fn test_area_params_default_to_stable() {
        let params = area_params(None);
        assert_eq!(params.trend_category, "stable");
        assert_eq!(params.trend, None);
    }
}
