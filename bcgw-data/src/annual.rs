use crate::monthly::MonthlyRecord;
use bcgw_utils::stats::{mean, median, quantile, sample_sd};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summary of one well's monthly medians over a calendar year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualRecord {
    #[serde(rename = "Well_Num")]
    pub well_num: u32,
    #[serde(rename = "EMS_ID")]
    pub ems_id: Option<String>,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "mean_GWL")]
    pub mean_gwl: f64,
    #[serde(rename = "med_GWL")]
    pub med_gwl: f64,
    #[serde(rename = "sd_GWL")]
    pub sd_gwl: Option<f64>,
    #[serde(rename = "q95_GWL")]
    pub q95_gwl: f64,
    #[serde(rename = "nMonths")]
    pub n_months: u32,
}

/// Annual statistics of monthly medians, per well and year.
///
/// Interpolated months count like observed ones; filter them out beforehand
/// to summarize observed months only.
pub fn annual_values(monthly: &[MonthlyRecord]) -> Vec<AnnualRecord> {
    let mut result = Vec::new();
    for (well_num, group) in MonthlyRecord::group_by_well(monthly) {
        let ems_id = group.iter().find_map(|record| record.ems_id.clone());
        let mut years: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
        for record in group {
            years.entry(record.year).or_default().push(record.med_gwl);
        }
        for (year, levels) in years {
            let (Some(mean_gwl), Some(med_gwl), Some(q95_gwl)) =
                (mean(&levels), median(&levels), quantile(&levels, 0.95))
            else {
                continue;
            };
            result.push(AnnualRecord {
                well_num,
                ems_id: ems_id.clone(),
                year,
                mean_gwl,
                med_gwl,
                sd_gwl: sample_sd(&levels),
                q95_gwl,
                n_months: levels.len() as u32,
            });
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::annual_values;
    use crate::monthly::MonthlyRecord;
    use chrono::NaiveDate;

    fn month(well_num: u32, year: i32, month: u32, med_gwl: f64) -> MonthlyRecord {
        MonthlyRecord {
            well_num,
            ems_id: None,
            year,
            month,
            date: NaiveDate::from_ymd_opt(year, month, 15).unwrap(),
            med_gwl,
            dev_med_gwl: None,
            n_readings: 10,
        }
    }

    #[test]
    fn test_annual_statistics() {
        let mut monthly: Vec<MonthlyRecord> =
            (1..=12).map(|m| month(309, 2020, m, m as f64)).collect();
        monthly.push(month(309, 2021, 1, 4.0));
        let annual = annual_values(&monthly);
        assert_eq!(annual.len(), 2);
        let first = &annual[0];
        assert_eq!(first.year, 2020);
        assert_eq!(first.n_months, 12);
        assert_eq!(first.mean_gwl, 6.5);
        assert_eq!(first.med_gwl, 6.5);
        assert!((first.q95_gwl - 11.45).abs() < 1e-9);
        assert!((first.sd_gwl.unwrap() - 3.605_551_275).abs() < 1e-6);
        let second = &annual[1];
        assert_eq!(second.n_months, 1);
        assert_eq!(second.sd_gwl, None);
        assert_eq!(second.q95_gwl, 4.0);
    }

    #[test]
    fn test_annual_groups_wells_separately() {
        let monthly = vec![month(2, 2020, 1, 1.0), month(1, 2020, 1, 3.0)];
        let annual = annual_values(&monthly);
        assert_eq!(annual.len(), 2);
        assert_eq!(annual[0].well_num, 2);
        assert_eq!(annual[1].well_num, 1);
    }
}
