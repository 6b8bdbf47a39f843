//! Trend tests over a monthly or annual table.

use crate::table::{read_table, write_table};
use bcgw_data::{AnnualRecord, MonthlyRecord};
use bcgw_trend::{gwl_zyp_test, TrendMethod, TrendOptions, TrendResult};
use log::info;

pub const DEFAULT_MONTHLY_COLUMN: &str = "med_GWL";
pub const DEFAULT_ANNUAL_COLUMN: &str = "mean_GWL";

/// Method names from the command line, duplicates dropped.
pub fn parse_methods<S: AsRef<str>>(names: &[S]) -> anyhow::Result<Vec<TrendMethod>> {
    let mut methods = Vec::with_capacity(names.len());
    for name in names {
        let method: TrendMethod = name.as_ref().parse()?;
        if !methods.contains(&method) {
            methods.push(method);
        }
    }
    if methods.is_empty() {
        anyhow::bail!("no trend methods given");
    }
    Ok(methods)
}

pub fn run_trend(
    input: &str,
    output: &str,
    column: Option<&str>,
    annual: bool,
    ungrouped: bool,
    options: &TrendOptions,
) -> anyhow::Result<()> {
    let results: Vec<TrendResult> = if annual {
        let rows: Vec<AnnualRecord> = read_table(input)?;
        let column = column.unwrap_or(DEFAULT_ANNUAL_COLUMN);
        gwl_zyp_test(&rows, column, !ungrouped, options)?
    } else {
        let rows: Vec<MonthlyRecord> = read_table(input)?;
        let column = column.unwrap_or(DEFAULT_MONTHLY_COLUMN);
        gwl_zyp_test(&rows, column, !ungrouped, options)?
    };
    info!("{} trend rows", results.len());
    write_table(output, &results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bcgw_trend::TrendError;

    fn annual_rows() -> Vec<AnnualRecord> {
        (2000..2012)
            .map(|year| {
                let level = 4.0 + 0.25 * (year - 2000) as f64;
                AnnualRecord {
                    well_num: 309,
                    ems_id: None,
                    year,
                    mean_gwl: level,
                    med_gwl: level,
                    sd_gwl: Some(0.1),
                    q95_gwl: level + 0.2,
                    n_months: 12,
                }
            })
            .collect()
    }

    #[test]
    fn test_parse_methods() {
        assert_eq!(
            parse_methods(&["zhang", "YuePilon", "zhang"]).unwrap(),
            vec![TrendMethod::Zhang, TrendMethod::YuePilon]
        );
        let err = parse_methods(&["yuepilon", "sen"]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TrendError>(),
            Some(TrendError::UnknownMethod(name)) if name == "sen"
        ));
        assert!(parse_methods::<&str>(&[]).is_err());
    }

    #[test]
    fn test_run_trend_with_selected_method() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("annual.csv");
        let output = dir.path().join("trends.csv");
        write_table(&input, &annual_rows()).unwrap();
        let options = TrendOptions {
            methods: parse_methods(&["zhang"]).unwrap(),
            ..TrendOptions::default()
        };
        run_trend(
            input.to_str().unwrap(),
            output.to_str().unwrap(),
            None,
            true,
            false,
            &options,
        )
        .unwrap();
        let results: Vec<TrendResult> = read_table(&output).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].well_num, Some(309));
        assert_eq!(results[0].test_type, TrendMethod::Zhang);
        assert!(results[0].trend.unwrap() > 0.0);
    }
}
